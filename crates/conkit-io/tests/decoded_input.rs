// Raw terminal bytes decoded and replayed through a memory surface

use std::sync::Arc;

use conkit_core::{Console, ConsoleState, Event, KeyParser, PrefixCompleter, Rect};
use conkit_io::{MemorySurface, TerminalHandle};

fn replay(surface: &MemorySurface, bytes: &[u8]) {
    let mut parser = KeyParser::new();
    let mut events = parser.feed(bytes);
    events.extend(parser.flush());
    for key in events {
        surface.push_event(Event::Key(key));
    }
}

fn run_console(surface: &Arc<MemorySurface>, console: &mut Console) {
    surface.close_input();
    let handle = TerminalHandle::shared(surface.clone());
    let (sender, queue) = conkit_core::EventQueue::channel(256);
    while let Ok(event) = handle.source.poll_event() {
        sender.send(event).unwrap();
    }
    drop(sender);
    console.run(&queue).unwrap();
}

#[test]
fn test_arrow_keys_and_backspace_from_bytes() {
    let surface = Arc::new(MemorySurface::new(20, 4));
    let mut console = Console::new(surface.clone(), Rect::full((20, 4)));

    // "abd", left, "c" inserted before 'd', DEL removes it again, right
    replay(&surface, b"abd\x1b[Dc\x7f\x1b[C");
    run_console(&surface, &mut console);

    assert_eq!(console.editor().line(), "abd");
    assert_eq!(console.editor().cursor_offset(), 3);
    assert_eq!(surface.row_text(0), "> abd");
}

#[test]
fn test_history_and_completion_from_bytes() {
    let surface = Arc::new(MemorySurface::new(30, 8));
    let mut console = Console::new(surface.clone(), Rect::full((30, 8)))
        .with_completer(PrefixCompleter::new(["carrot", "cabbage"]));

    // "car" tab completes, enter echoes, up recalls, ctrl-c stops
    replay(&surface, b"car\t\r\x1b[A\x03");
    run_console(&surface, &mut console);

    assert_eq!(console.state(), ConsoleState::Terminated);
    assert_eq!(surface.row_text(0), "> carrot");
    assert_eq!(surface.row_text(1), "carrot");
    assert_eq!(surface.row_text(2), "> carrot");
}

#[test]
fn test_utf8_input_from_bytes() {
    let surface = Arc::new(MemorySurface::new(20, 4));
    let mut console = Console::new(surface.clone(), Rect::full((20, 4)));

    replay(&surface, "héllo ñ".as_bytes());
    run_console(&surface, &mut console);

    assert_eq!(console.editor().line(), "héllo ñ");
}
