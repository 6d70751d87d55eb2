use std::collections::VecDeque;
use std::io;
use std::os::unix::io::AsRawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use conkit_core::{
    Attribute, Cell, CellSurface, Color, ConsoleError, ConsoleResult, Event, EventSource,
    KeyParser,
};
use log::{debug, error, trace};

/// How long a lone ESC waits for the rest of a sequence
const ESCAPE_TIMEOUT_MS: i32 = 50;
/// Poll interval used to notice window size changes
const RESIZE_POLL_MS: i32 = 200;

struct UnixRawModeGuard {
    stdin_fd: i32,
    original_termios: libc::termios,
    original_flags: i32,
}

impl Drop for UnixRawModeGuard {
    fn drop(&mut self) {
        unsafe {
            let _ = libc::tcsetattr(self.stdin_fd, libc::TCSANOW, &self.original_termios);
            let _ = libc::fcntl(self.stdin_fd, libc::F_SETFL, self.original_flags);
        }
    }
}

fn enter_raw_mode(fd: i32) -> io::Result<UnixRawModeGuard> {
    let mut original_termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(fd, &mut original_termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    let mut raw = original_termios;
    raw.c_lflag &= !(libc::ICANON
        | libc::ECHO
        | libc::ECHOE
        | libc::ECHOK
        | libc::ECHONL
        | libc::ISIG
        | libc::IEXTEN);
    raw.c_iflag &= !(libc::IXON
        | libc::IXOFF
        | libc::ICRNL
        | libc::INLCR
        | libc::IGNCR
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP);
    raw.c_oflag &= !libc::OPOST;
    raw.c_cflag &= !libc::CSIZE;
    raw.c_cflag |= libc::CS8;
    raw.c_cc[libc::VMIN] = 0;
    raw.c_cc[libc::VTIME] = 0;
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
        return Err(io::Error::last_os_error());
    }
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags == -1 {
        return Err(io::Error::last_os_error());
    }
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(UnixRawModeGuard {
        stdin_fd: fd,
        original_termios,
        original_flags: flags,
    })
}

fn query_window_size(fd: i32) -> io::Result<(usize, usize)> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    if unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok((ws.ws_col as usize, ws.ws_row as usize))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Back buffer drawn by widgets and the front buffer last sent to the terminal
struct Screen {
    width: usize,
    height: usize,
    back: Vec<Cell>,
    front: Vec<Cell>,
}

impl Screen {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            back: vec![Cell::BLANK; width * height],
            front: vec![Cell::BLANK; width * height],
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        let mut back = vec![Cell::BLANK; width * height];
        for y in 0..height.min(self.height) {
            for x in 0..width.min(self.width) {
                back[y * width + x] = self.back[y * self.width + x];
            }
        }
        self.width = width;
        self.height = height;
        self.back = back;
        // Force a full repaint
        self.front = vec![
            Cell {
                ch: '\0',
                ..Cell::BLANK
            };
            width * height
        ];
    }

    /// Escape sequences that bring the terminal from `front` to `back`
    fn render_diff(&self) -> String {
        let mut out = String::new();
        let mut style: Option<(Attribute, Attribute)> = None;
        let mut expected_pos: Option<(usize, usize)> = None;

        for (index, cell) in self.back.iter().enumerate() {
            if self.front.get(index) == Some(cell) {
                continue;
            }
            let (x, y) = (index % self.width, index / self.width);
            if expected_pos != Some((x, y)) {
                out.push_str(&format!("\x1b[{};{}H", y + 1, x + 1));
            }
            if style != Some((cell.fg, cell.bg)) {
                out.push_str(&sgr(cell.fg, cell.bg));
                style = Some((cell.fg, cell.bg));
            }
            out.push(if cell.ch.is_control() { ' ' } else { cell.ch });
            expected_pos = if x + 1 < self.width {
                Some((x + 1, y))
            } else {
                None
            };
        }

        if style.is_some() {
            out.push_str("\x1b[0m");
        }
        out
    }
}

fn color_code(color: Color) -> Option<u8> {
    match color {
        Color::Default => None,
        Color::Black => Some(0),
        Color::Red => Some(1),
        Color::Green => Some(2),
        Color::Yellow => Some(3),
        Color::Blue => Some(4),
        Color::Magenta => Some(5),
        Color::Cyan => Some(6),
        Color::White => Some(7),
    }
}

/// Select Graphic Rendition sequence for a cell's attributes
fn sgr(fg: Attribute, bg: Attribute) -> String {
    let mut codes = vec!["0".to_string()];
    if fg.bold || bg.bold {
        codes.push("1".to_string());
    }
    if fg.underline || bg.underline {
        codes.push("4".to_string());
    }
    if fg.reverse || bg.reverse {
        codes.push("7".to_string());
    }
    if let Some(n) = color_code(fg.color) {
        codes.push(format!("{}", 30 + n));
    }
    if let Some(n) = color_code(bg.color) {
        codes.push(format!("{}", 40 + n));
    }
    format!("\x1b[{}m", codes.join(";"))
}

struct InputState {
    parser: KeyParser,
    pending: VecDeque<Event>,
}

/// Raw-mode VT terminal on stdin/stdout
pub struct UnixTerminal {
    stdin_fd: i32,
    stdout_fd: i32,
    raw_guard: Mutex<Option<UnixRawModeGuard>>,
    screen: Mutex<Screen>,
    input: Mutex<InputState>,
    active: AtomicBool,
}

impl UnixTerminal {
    pub fn new() -> ConsoleResult<Self> {
        let stdout_fd = libc::STDOUT_FILENO;
        if unsafe { libc::isatty(stdout_fd) } == 0 {
            return Err(ConsoleError::TerminalError(
                "stdout is not a terminal".to_string(),
            ));
        }
        let (width, height) = query_window_size(stdout_fd)?;

        Ok(Self {
            stdin_fd: io::stdin().as_raw_fd(),
            stdout_fd,
            raw_guard: Mutex::new(None),
            screen: Mutex::new(Screen::new(width, height)),
            input: Mutex::new(InputState {
                parser: KeyParser::new(),
                pending: VecDeque::new(),
            }),
            active: AtomicBool::new(false),
        })
    }

    fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        let mut written = 0;
        while written < bytes.len() {
            let result = unsafe {
                libc::write(
                    self.stdout_fd,
                    bytes[written..].as_ptr() as *const libc::c_void,
                    bytes.len() - written,
                )
            };

            if result == -1 {
                let error = io::Error::last_os_error();
                match error.raw_os_error() {
                    Some(libc::EINTR) => continue,
                    _ => return Err(error),
                }
            }
            written += result as usize;
        }
        Ok(())
    }

    /// Wait up to `timeout_ms` for stdin; true when bytes are readable
    fn wait_readable(&self, timeout_ms: i32) -> ConsoleResult<bool> {
        let mut poll_fd = libc::pollfd {
            fd: self.stdin_fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let result = unsafe { libc::poll(&mut poll_fd as *mut libc::pollfd, 1, timeout_ms) };
        if result == -1 {
            let error = io::Error::last_os_error();
            if error.raw_os_error() == Some(libc::EINTR) {
                return Ok(false);
            }
            return Err(error.into());
        }
        Ok(result > 0)
    }

    fn read_available(&self, input: &mut InputState) -> ConsoleResult<()> {
        let mut buffer = [0u8; 256];
        loop {
            let result = unsafe {
                libc::read(
                    self.stdin_fd,
                    buffer.as_mut_ptr() as *mut libc::c_void,
                    buffer.len(),
                )
            };

            if result == -1 {
                let error = io::Error::last_os_error();
                return match error.kind() {
                    io::ErrorKind::WouldBlock => Ok(()),
                    io::ErrorKind::Interrupted => continue,
                    _ => Err(error.into()),
                };
            }
            if result == 0 {
                return Err(ConsoleError::TerminalError("stdin closed".to_string()));
            }

            let bytes = &buffer[..result as usize];
            trace!("UnixTerminal: read {bytes:?}");
            input
                .pending
                .extend(input.parser.feed(bytes).into_iter().map(Event::Key));
        }
    }

    fn check_resize(&self, input: &mut InputState) {
        let Ok((width, height)) = query_window_size(self.stdout_fd) else {
            return;
        };
        let mut screen = lock(&self.screen);
        if (width, height) != (screen.width, screen.height) {
            debug!("UnixTerminal: resized to {width}x{height}");
            screen.resize(width, height);
            input.pending.push_back(Event::Resize { width, height });
        }
    }
}

impl CellSurface for UnixTerminal {
    fn init(&self) -> ConsoleResult<()> {
        if self.active.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let guard = enter_raw_mode(self.stdin_fd)?;
        *lock(&self.raw_guard) = Some(guard);

        self.write_bytes(b"\x1b[?1049h\x1b[?25l\x1b[0m\x1b[2J")?;
        let mut screen = lock(&self.screen);
        let (width, height) = (screen.width, screen.height);
        *screen = Screen::new(width, height);
        debug!("UnixTerminal: initialized {width}x{height}");
        Ok(())
    }

    fn close(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Err(e) = self.write_bytes(b"\x1b[0m\x1b[?25h\x1b[?1049l") {
            error!("UnixTerminal: failed to restore screen: {e}");
        }
        lock(&self.raw_guard).take();
        debug!("UnixTerminal: closed");
    }

    fn size(&self) -> (usize, usize) {
        let screen = lock(&self.screen);
        (screen.width, screen.height)
    }

    fn set_cell(&self, x: usize, y: usize, ch: char, fg: Attribute, bg: Attribute) {
        let mut screen = lock(&self.screen);
        if x < screen.width && y < screen.height {
            let index = y * screen.width + x;
            screen.back[index] = Cell { ch, fg, bg };
        }
    }

    fn cell_buffer(&self) -> Vec<Cell> {
        lock(&self.screen).back.clone()
    }

    fn flush(&self) -> ConsoleResult<()> {
        let mut screen = lock(&self.screen);
        let output = screen.render_diff();
        if !output.is_empty() {
            self.write_bytes(output.as_bytes())
                .map_err(|e| ConsoleError::FlushFailed(e.to_string()))?;
        }
        screen.front = screen.back.clone();
        Ok(())
    }
}

impl EventSource for UnixTerminal {
    fn poll_event(&self) -> ConsoleResult<Event> {
        let mut input = lock(&self.input);
        loop {
            if let Some(event) = input.pending.pop_front() {
                return Ok(event);
            }

            let timeout = if input.parser.has_pending() {
                ESCAPE_TIMEOUT_MS
            } else {
                RESIZE_POLL_MS
            };

            if self.wait_readable(timeout)? {
                self.read_available(&mut input)?;
            } else if input.parser.has_pending() {
                let flushed = input.parser.flush();
                input.pending.extend(flushed.into_iter().map(Event::Key));
            } else {
                self.check_resize(&mut input);
            }
        }
    }
}

impl Drop for UnixTerminal {
    fn drop(&mut self) {
        self.close();
    }
}
