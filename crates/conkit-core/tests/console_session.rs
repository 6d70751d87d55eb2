// End-to-end console behavior on an in-memory surface

mod common;

use std::sync::Arc;

use common::*;
use conkit_core::{
    Console, ConsoleConfig, ConsoleError, ConsoleState, ConsoleWriter, Event, EventQueue,
    Execution, Key, PrefixCompleter, Rect,
};
use conkit_io::MemorySurface;

#[test]
fn test_typed_line_is_echoed() {
    let (surface, mut console) = console(20, 5);
    submit(&mut console, "hello");

    insta::assert_snapshot!(surface.screen_text(), @r"
    > hello
    hello
    >
    ");
    assert_eq!(console.state(), ConsoleState::AwaitingInput);
    assert_eq!(console.history().len(), 1);
}

#[test]
fn test_cursor_is_reverse_video() {
    let (surface, mut console) = console(20, 5);
    type_text(&mut console, "ab");
    assert_eq!(surface.highlighted_cells(), vec![(4, 0)]);

    press(&mut console, Key::Left);
    assert_eq!(surface.highlighted_cells(), vec![(3, 0)]);
    assert_eq!(surface.cell(3, 0).map(|c| c.ch), Some('b'));
}

#[test]
fn test_exit_terminates_without_new_prompt() {
    let (surface, mut console) = console(20, 5);
    submit(&mut console, "exit");

    assert_eq!(console.state(), ConsoleState::Terminated);
    assert_eq!(console.last_status(), 0);
    assert_eq!(surface.screen_text(), "> exit");

    // Input after termination is ignored
    type_text(&mut console, "more");
    assert_eq!(surface.screen_text(), "> exit");
}

#[test]
fn test_control_c_terminates() {
    let (_surface, mut console) = console(20, 5);
    type_text(&mut console, "half");
    press(&mut console, Key::ControlC);
    assert_eq!(console.state(), ConsoleState::Terminated);
    assert!(console.history().is_empty());
}

#[test]
fn test_empty_line_is_not_recorded() {
    let (surface, mut console) = console(20, 5);
    press(&mut console, Key::Enter);
    assert!(console.history().is_empty());
    assert_eq!(surface.screen_lines()[..2], [">".to_string(), ">".to_string()]);
}

#[test]
fn test_editing_keys() {
    let (surface, mut console) = console(20, 5);
    type_text(&mut console, "abc");
    press(&mut console, Key::Left);
    press(&mut console, Key::Backspace);
    assert_eq!(console.editor().line(), "ac");
    assert_eq!(console.editor().cursor_offset(), 1);

    press(&mut console, Key::Right);
    assert_eq!(console.editor().cursor_offset(), 2);
    press(&mut console, Key::Right);
    assert_eq!(console.editor().cursor_offset(), 2);

    press(&mut console, Key::ControlH);
    assert_eq!(console.editor().line(), "a");
    console.handle_event(Event::key(Key::Space));
    type_text(&mut console, "b");
    assert_eq!(surface.row_text(0), "> a b");
}

#[test]
fn test_wide_and_zero_width_characters_are_dropped() {
    let (_surface, mut console) = console(20, 5);
    type_text(&mut console, "a中\u{301}b");
    assert_eq!(console.editor().line(), "ab");
}

#[test]
fn test_unhandled_keys_are_ignored() {
    let (surface, mut console) = console(20, 5);
    type_text(&mut console, "x");
    for key in [Key::F1, Key::Escape, Key::Home, Key::Delete, Key::ControlA] {
        press(&mut console, key);
    }
    console.handle_event(Event::Resize {
        width: 40,
        height: 10,
    });
    assert_eq!(console.editor().line(), "x");
    assert_eq!(surface.row_text(0), "> x");
}

#[test]
fn test_history_browsing_keeps_draft() {
    let (surface, mut console) = console(30, 10);
    submit(&mut console, "first");
    submit(&mut console, "second");
    type_text(&mut console, "dr");

    press(&mut console, Key::Up);
    assert_eq!(console.editor().line(), "second");
    press(&mut console, Key::Up);
    assert_eq!(console.editor().line(), "first");
    press(&mut console, Key::Up);
    assert_eq!(console.editor().line(), "first");

    press(&mut console, Key::Down);
    assert_eq!(console.editor().line(), "second");
    press(&mut console, Key::Down);
    assert_eq!(console.editor().line(), "dr");
    press(&mut console, Key::Down);
    assert_eq!(console.editor().line(), "dr");
    assert_eq!(surface.row_text(4), "> dr");
}

#[test]
fn test_recalled_shorter_entry_clears_longer_line() {
    let (surface, mut console) = console(30, 10);
    submit(&mut console, "ls");
    type_text(&mut console, "a much longer draft");
    press(&mut console, Key::Up);
    assert_eq!(surface.row_text(2), "> ls");
}

#[test]
fn test_recall_after_draft_outgrew_widget() {
    let (surface, mut console) = console(6, 2);
    submit(&mut console, "ls");
    type_text(&mut console, "abcdefghijkl");
    assert_eq!(console.editor().prompt_row(), -1);

    press(&mut console, Key::Up);
    assert_eq!(console.editor().line(), "ls");
    assert_eq!(surface.screen_lines(), vec!["> ls", ""]);
    assert_eq!(surface.highlighted_cells(), vec![(4, 0)]);

    type_text(&mut console, "x");
    assert_eq!(surface.row_text(0), "> lsx");
    assert_eq!(surface.highlighted_cells(), vec![(5, 0)]);
}

#[test]
fn test_full_width_echo_leaves_no_blank_row() {
    let (surface, mut console) = console(6, 5);
    submit(&mut console, "abcdef");

    insta::assert_snapshot!(surface.screen_text(), @r"
    > abcd
    ef
    abcdef
    >
    ");
}

#[test]
fn test_full_width_completion_row_leaves_no_blank_row() {
    let (surface, console) = console(10, 5);
    let mut console = console.with_completer(PrefixCompleter::new(["xabc", "xdef"]));
    type_text(&mut console, "x");
    press(&mut console, Key::Tab);

    assert_eq!(surface.screen_lines(), vec!["> x", "xabc  xdef", "> x", "", ""]);
}

#[test]
fn test_single_completion_replaces_line() {
    let (surface, mut console) = completing_console(20, 5);
    type_text(&mut console, "ca");
    press(&mut console, Key::Tab);
    assert_eq!(console.editor().line(), "carrot");
    assert_eq!(surface.row_text(0), "> carrot");
}

#[test]
fn test_ambiguous_completion_lists_matches() {
    let (surface, mut console) = completing_console(20, 5);
    type_text(&mut console, "j");
    press(&mut console, Key::Tab);

    insta::assert_snapshot!(surface.screen_text(), @r"
    > ja
    jack  jane
    > ja
    ");
    assert_eq!(console.editor().line(), "ja");
    assert_eq!(console.editor().cursor_offset(), 2);
}

#[test]
fn test_completion_with_terminal_prefix() {
    let (surface, mut console) = completing_console(20, 5);
    type_text(&mut console, "a");
    press(&mut console, Key::Tab);

    assert_eq!(surface.row_text(1), "a    ab   abc");
    assert_eq!(console.editor().line(), "a");
}

#[test]
fn test_completion_miss_changes_nothing() {
    let (surface, mut console) = completing_console(20, 5);
    type_text(&mut console, "zz");
    press(&mut console, Key::Tab);
    assert_eq!(surface.screen_text(), "> zz");
}

#[test]
fn test_tab_without_completer_is_ignored() {
    let (surface, mut console) = console(20, 5);
    type_text(&mut console, "j");
    press(&mut console, Key::Tab);
    assert_eq!(surface.screen_text(), "> j");
}

#[test]
fn test_output_scrolls_at_bottom() {
    let (surface, mut console) = console(10, 3);
    submit(&mut console, "a");
    submit(&mut console, "b");

    insta::assert_snapshot!(surface.screen_text(), @r"
    > b
    b
    >
    ");
}

#[test]
fn test_long_line_wraps() {
    let (surface, mut console) = console(6, 4);
    type_text(&mut console, "abcdefgh");
    assert_eq!(surface.row_text(0), "> abcd");
    assert_eq!(surface.row_text(1), "efgh");
    assert_eq!(console.editor().cursor_offset(), 8);
}

#[test]
fn test_widget_rect_confines_drawing() {
    let surface = Arc::new(MemorySurface::new(20, 4));
    let mut console = Console::new(surface.clone(), Rect::new(5, 1, 6, 2));
    console.start();
    type_text(&mut console, "abcdefghijkl");

    assert_eq!(surface.row_text(0), "");
    assert_eq!(surface.row_text(1), "     efghij");
    assert_eq!(surface.row_text(2), "     kl");
    assert_eq!(surface.row_text(3), "");
    assert_eq!(console.editor().cursor_offset(), 12);
}

#[test]
fn test_custom_executer_status() {
    let (surface, console) = console(30, 5);
    let mut console = console.with_executer(|command: &str, out: &mut dyn ConsoleWriter| {
        out.write("len=");
        out.write_line(&command.len().to_string());
        Execution::proceed(command.len() as i32)
    });
    submit(&mut console, "four");

    assert_eq!(console.last_status(), 4);
    assert_eq!(surface.row_text(1), "len=4");
}

#[test]
fn test_custom_prompt() {
    let surface = Arc::new(MemorySurface::new(20, 3));
    let config = ConsoleConfig::default().with_prompt("$ ");
    let mut console = Console::with_config(surface.clone(), Rect::full((20, 3)), config).unwrap();
    console.start();
    assert_eq!(surface.row_text(0), "$");
}

#[test]
fn test_invalid_config_is_rejected() {
    let surface = Arc::new(MemorySurface::new(20, 3));
    let config = ConsoleConfig::default().with_history_capacity(0);
    let result = Console::with_config(surface, Rect::full((20, 3)), config);
    assert!(matches!(result, Err(ConsoleError::ConfigurationError(_))));
}

#[test]
fn test_run_consumes_queue_until_exit() {
    let surface = Arc::new(MemorySurface::new(20, 5));
    let mut console = Console::new(surface.clone(), Rect::full((20, 5)));
    let (sender, queue) = EventQueue::channel(64);

    let mut events = Event::text("hi");
    events.push(Event::key(Key::Enter));
    events.extend(Event::text("exit"));
    events.push(Event::key(Key::Enter));
    events.extend(Event::text("ignored"));
    let total = events.len();
    for event in events {
        sender.send(event).unwrap();
    }

    console.run(&queue).unwrap();
    assert_eq!(console.state(), ConsoleState::Terminated);
    assert_eq!(surface.screen_text(), "> hi\nhi\n> exit");
    // One presentation for the first prompt, one per consumed event
    assert_eq!(surface.flush_count(), 1 + total - "ignored".len());
    assert_eq!(queue.len(), "ignored".len());
}

#[test]
fn test_run_returns_when_queue_disconnects() {
    let surface = Arc::new(MemorySurface::new(20, 5));
    let mut console = Console::new(surface.clone(), Rect::full((20, 5)));
    let (sender, queue) = EventQueue::channel(10);
    sender.send(Event::char('x')).unwrap();
    drop(sender);

    console.run(&queue).unwrap();
    assert_eq!(console.state(), ConsoleState::AwaitingInput);
    assert_eq!(surface.row_text(0), "> x");
}

#[test]
fn test_flush_failure_is_fatal() {
    let surface = Arc::new(MemorySurface::new(20, 5));
    let mut console = Console::new(surface.clone(), Rect::full((20, 5)));
    let (sender, queue) = EventQueue::channel(10);
    sender.send(Event::char('x')).unwrap();

    surface.set_flush_failure(true);
    let result = console.run(&queue);
    assert!(matches!(result, Err(ConsoleError::FlushFailed(_))));
}
