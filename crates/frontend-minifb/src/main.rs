//! Emuchron: desktop emulator for the Monochron clock.
//!
//! Provides two execution modes:
//!
//! - **GUI mode** (default): the clock runs on a worker thread and streams
//!   redraw events to a scaled minifb window. Alarm beeps play through rodio.
//! - **Terminal mode** (`--mode terminal`): single-threaded, prints the
//!   display as half-block text every few ticks.
//!
//! GUI keys: Space=next face I=invert S=PNG screenshot Esc=quit

use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};
use log::{info, warn};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use monochron_core::audio::{Beeper, SilentBeeper};
use monochron_core::config::{parse_alarm, EmuConfig};
use monochron_core::rtc::{SimulatedClock, SystemTimeSource, TimeSource};
use monochron_core::sink::{CallbackSink, EventQueue, LcdEvent, QueueSink};
use monochron_core::{png, Lcd, LcdImage, Monochron, GLCD_XPIXELS, GLCD_YPIXELS};
use std::cell::RefCell;
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Audio output sample rate in Hz
const AUDIO_SAMPLE_RATE: u32 = 44100;
/// Square wave amplitude (0.0–1.0)
const AUDIO_VOLUME: f32 = 0.15;
/// Lit pixel on a blue backlit panel
const PIXEL_ON: u32 = 0x00E8_F0FF;
const PIXEL_OFF: u32 = 0x0018_2C6C;
const WINDOW_TITLE: &str = "Emuchron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Gui,
    Terminal,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "emuchron", version, about = "Monochron clock emulator")]
struct Args {
    #[arg(long, value_enum, default_value_t = Mode::Gui)]
    mode: Mode,
    /// Window scale (1-12)
    #[arg(long, default_value_t = 6)]
    scale: usize,
    /// Stop after N ticks
    #[arg(long)]
    ticks: Option<u64>,
    /// Face shown at start: 0 digital, 1 analog, 2 banner
    #[arg(long, default_value_t = 0)]
    face: usize,
    /// Draw light-on-dark
    #[arg(long)]
    inverted: bool,
    /// Alarm time as HH:MM
    #[arg(long, value_parser = alarm_arg)]
    alarm: Option<(u8, u8)>,
    /// Run a simulated clock from "YYYY-MM-DD HH:MM:SS" instead of the host clock
    #[arg(long, value_parser = start_arg)]
    start: Option<NaiveDateTime>,
    /// Scheduler tick period in milliseconds
    #[arg(long, default_value_t = 75)]
    tick_ms: u64,
    /// Terminal mode: print the display every N ticks
    #[arg(long, default_value_t = 14)]
    refresh_ticks: u64,
    /// Restore an lcd state file before the first tick
    #[arg(long)]
    load: Option<PathBuf>,
    /// Write an lcd state file on exit
    #[arg(long)]
    save: Option<PathBuf>,
    /// Write a PNG screenshot on exit
    #[arg(long)]
    screenshot: Option<PathBuf>,
    #[arg(long)]
    mute: bool,
    #[arg(long)]
    debug: bool,
    /// Host clock UTC offset in minutes (default: local time zone)
    #[arg(long, allow_hyphen_values = true)]
    utc_offset: Option<i32>,
}

fn alarm_arg(text: &str) -> Result<(u8, u8), String> {
    parse_alarm(text).ok_or_else(|| format!("'{}' is not an HH:MM time", text))
}

fn start_arg(text: &str) -> Result<NaiveDateTime, String> {
    SimulatedClock::parse_start(text)
        .ok_or_else(|| format!("'{}' is not a YYYY-MM-DD HH:MM:SS time", text))
}

impl Args {
    fn config(&self) -> EmuConfig {
        EmuConfig {
            tick: Duration::from_millis(self.tick_ms.max(1)),
            inverted: self.inverted,
            alarm: self.alarm,
            start_face: self.face,
            utc_offset_minutes: self.utc_offset,
        }
    }

    fn time_source(&self, config: &EmuConfig) -> Box<dyn TimeSource> {
        match self.start {
            Some(start) => Box::new(SimulatedClock::new(start, config.tick)),
            None => Box::new(SystemTimeSource::new(config.utc_offset_minutes)),
        }
    }

    /// Real-time pacing, skipped for bounded simulated runs.
    fn paced(&self) -> bool {
        !(self.start.is_some() && self.ticks.is_some())
    }

    fn done(&self, ticks: u64) -> bool {
        self.ticks.is_some_and(|limit| ticks >= limit)
    }
}

// ─── Audio ──────────────────────────────────────────────────────────────────

/// Finite square wave tone.
struct SquareWave {
    phase: f32,
    step: f32,
    remaining: usize,
}

impl SquareWave {
    fn new(frequency_hz: f32, duration_ms: u16) -> Self {
        SquareWave {
            phase: 0.0,
            step: frequency_hz / AUDIO_SAMPLE_RATE as f32,
            remaining: AUDIO_SAMPLE_RATE as usize * duration_ms as usize / 1000,
        }
    }
}

impl Iterator for SquareWave {
    type Item = f32;
    fn next(&mut self) -> Option<f32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let s = if self.phase < 0.5 { AUDIO_VOLUME } else { -AUDIO_VOLUME };
        self.phase = (self.phase + self.step) % 1.0;
        Some(s)
    }
}

impl rodio::Source for SquareWave {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.remaining)
    }
    fn channels(&self) -> u16 {
        1
    }
    fn sample_rate(&self) -> u32 {
        AUDIO_SAMPLE_RATE
    }
    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Alarm beeper on the default audio device. Must stay on the thread that
/// opened it.
struct SquareBeeper {
    _stream: rodio::OutputStream,
    handle: rodio::OutputStreamHandle,
}

impl SquareBeeper {
    fn open() -> Option<Self> {
        match rodio::OutputStream::try_default() {
            Ok((stream, handle)) => Some(SquareBeeper { _stream: stream, handle }),
            Err(e) => {
                warn!("audio device: {}", e);
                None
            }
        }
    }
}

impl Beeper for SquareBeeper {
    fn beep(&mut self, frequency_hz: u16, duration_ms: u16) {
        if let Err(e) = self.handle.play_raw(SquareWave::new(frequency_hz as f32, duration_ms)) {
            warn!("audio: {}", e);
        }
    }
}

/// Terminal bell in place of a tone.
struct TerminalBell;

impl Beeper for TerminalBell {
    fn beep(&mut self, _frequency_hz: u16, _duration_ms: u16) {
        let mut out = std::io::stdout();
        let _ = out.write_all(b"\x07");
        let _ = out.flush();
    }
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    let args = Args::parse();
    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match args.mode {
        Mode::Gui => run_gui(&args),
        Mode::Terminal => run_terminal(&args),
    };
    if let Err(e) = result {
        eprintln!("emuchron: {}", e);
        std::process::exit(1);
    }
}

fn write_screenshot(image: &LcdImage, path: &Path, scale: usize) -> Result<(), Box<dyn Error>> {
    fs::write(path, png::encode_lcd(image, scale as u32))?;
    info!("screenshot: {}", path.display());
    Ok(())
}

// ─── GUI Mode ───────────────────────────────────────────────────────────────

enum Command {
    NextFace,
    ToggleInverted,
}

fn run_gui(args: &Args) -> Result<(), Box<dyn Error>> {
    let scale = args.scale.clamp(1, 12);
    let (width, height) = (GLCD_XPIXELS * scale, GLCD_YPIXELS * scale);
    let mut window = Window::new(WINDOW_TITLE, width, height, WindowOptions::default())?;
    window.set_target_fps(60);

    let queue = EventQueue::unbounded();
    let (tx, rx) = mpsc::channel();
    let quit = Arc::new(AtomicBool::new(false));
    let ticks = Arc::new(AtomicU64::new(0));
    let worker = {
        let (args, queue, quit, ticks) = (args.clone(), queue.clone(), quit.clone(), ticks.clone());
        thread::Builder::new()
            .name("monochron".into())
            .spawn(move || run_worker(&args, queue, rx, &quit, &ticks))?
    };

    let mut image = LcdImage::new();
    let mut buffer = Vec::new();
    let mut screenshot_n = 0u32;
    let mut last_title = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        // an unbounded clock only stops on error
        if worker.is_finished() && args.ticks.is_none() {
            break;
        }
        if window.is_key_pressed(Key::Space, KeyRepeat::No) {
            let _ = tx.send(Command::NextFace);
        }
        if window.is_key_pressed(Key::I, KeyRepeat::No) {
            let _ = tx.send(Command::ToggleInverted);
        }
        queue.drain_into(&mut image)?;
        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            let path = PathBuf::from(format!("emuchron_{:04}.png", screenshot_n));
            match write_screenshot(&image, &path, scale) {
                Ok(()) => screenshot_n += 1,
                Err(e) => warn!("screenshot: {}", e),
            }
        }

        if image.dirty {
            image.render_rgb(scale, PIXEL_ON, PIXEL_OFF, &mut buffer);
            image.dirty = false;
        }
        window.update_with_buffer(&buffer, width, height)?;

        if last_title.elapsed() >= Duration::from_secs(2) {
            window.set_title(&format!("{} - tick {}", WINDOW_TITLE, ticks.load(Ordering::Relaxed)));
            last_title = Instant::now();
        }
    }

    quit.store(true, Ordering::Relaxed);
    match worker.join() {
        Ok(result) => result?,
        Err(_) => return Err("clock thread panicked".into()),
    }
    queue.drain_into(&mut image)?;
    if let Some(path) = &args.screenshot {
        write_screenshot(&image, path, scale)?;
    }
    Ok(())
}

/// Owns the clock for the whole GUI session; the clock cannot leave this
/// thread, so the state file is written here.
fn run_worker(
    args: &Args,
    queue: EventQueue,
    commands: Receiver<Command>,
    quit: &AtomicBool,
    ticks: &AtomicU64,
) -> monochron_core::Result<()> {
    let config = args.config();
    let mut lcd = Lcd::new();
    lcd.add_sink(Box::new(QueueSink::new(queue)));
    let beeper: Box<dyn Beeper> = match (args.mute, SquareBeeper::open()) {
        (false, Some(beeper)) => Box::new(beeper),
        _ => Box::new(SilentBeeper),
    };
    let time = args.time_source(&config);
    let mut clock = Monochron::new(config, lcd, time, beeper);
    if let Some(path) = &args.load {
        clock.load_state(path)?;
    }

    while !quit.load(Ordering::Relaxed) && !args.done(clock.tick_count) {
        for command in commands.try_iter() {
            match command {
                Command::NextFace => clock.next_face(),
                Command::ToggleInverted => clock.toggle_inverted(),
            }
        }
        let started = Instant::now();
        clock.run_tick()?;
        ticks.store(clock.tick_count, Ordering::Relaxed);
        if args.paced() {
            thread::sleep(clock.config.tick.saturating_sub(started.elapsed()));
        }
    }
    info!(
        "clock stopped after {} ticks ({} over budget)",
        clock.tick_count, clock.scheduler.overruns
    );
    if let Some(path) = &args.save {
        clock.save_state(path)?;
    }
    Ok(())
}

// ─── Terminal Mode ──────────────────────────────────────────────────────────

fn run_terminal(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = args.config();
    let image = Rc::new(RefCell::new(LcdImage::new()));
    let mut lcd = Lcd::new();
    let sink_image = image.clone();
    lcd.add_sink(Box::new(CallbackSink::new(move |event: &LcdEvent| {
        sink_image.borrow_mut().apply(event)
    })));
    let beeper: Box<dyn Beeper> =
        if args.mute { Box::new(SilentBeeper) } else { Box::new(TerminalBell) };
    let time = args.time_source(&config);
    let mut clock = Monochron::new(config, lcd, time, beeper);
    if let Some(path) = &args.load {
        clock.load_state(path)?;
    }

    let refresh = args.refresh_ticks.max(1);
    let mut printed = false;
    while !args.done(clock.tick_count) {
        let started = Instant::now();
        let now = clock.run_tick()?;
        printed = clock.tick_count % refresh == 0;
        if printed {
            let image = image.borrow();
            println!(
                "=== tick {}  {:02}:{:02}:{:02}  {}  ({} px lit) ===",
                clock.tick_count,
                now.hour,
                now.minute,
                now.second,
                clock.scheduler.active_name().unwrap_or("-"),
                image.lit_count()
            );
            if args.debug {
                let lcd = clock.glcd.lcd();
                println!(
                    "    bus: cmd={} rd={} wr={}",
                    lcd.dbg_cmd_count, lcd.dbg_read_count, lcd.dbg_write_count
                );
            }
            print!("{}", image.to_text());
        }
        if args.debug && printed {
            clock.glcd.lcd_mut().dbg_reset_counters();
        }
        if args.paced() {
            thread::sleep(clock.config.tick.saturating_sub(started.elapsed()));
        }
    }
    if !printed {
        println!("=== tick {} ===", clock.tick_count);
        print!("{}", image.borrow().to_text());
    }

    if let Some(path) = &args.save {
        clock.save_state(path)?;
    }
    if let Some(path) = &args.screenshot {
        write_screenshot(&image.borrow(), path, args.scale.clamp(1, 12))?;
    }
    Ok(())
}
