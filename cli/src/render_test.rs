use super::*;
use chat::{Message, Role};

fn message(role: Role, content: &str) -> Message {
    Message { id: "1".into(), role, content: content.into(), timestamp: 1 }
}

fn streaming(id: Uuid, pending: &str) -> SessionSnapshot {
    SessionSnapshot {
        history: vec![Message::welcome(), message(Role::User, "hi")],
        pending: pending.into(),
        status: SessionStatus::Streaming,
        active_request: Some(id),
    }
}

fn text(out: &[u8]) -> &str {
    std::str::from_utf8(out).unwrap()
}

#[test]
fn prints_only_new_pending_text() {
    let id = Uuid::new_v4();
    let mut renderer = ReplyRenderer::new(id, 2);
    let mut out = Vec::new();

    assert_eq!(renderer.update(&streaming(id, "He"), &mut out).unwrap(), None);
    assert_eq!(renderer.update(&streaming(id, "Hello"), &mut out).unwrap(), None);
    assert_eq!(renderer.update(&streaming(id, "Hello"), &mut out).unwrap(), None);
    assert_eq!(text(&out), "Hello");
}

#[test]
fn finished_reply_prints_remainder() {
    let id = Uuid::new_v4();
    let mut renderer = ReplyRenderer::new(id, 2);
    let mut out = Vec::new();
    renderer.update(&streaming(id, "Hel"), &mut out).unwrap();

    let mut done = streaming(id, "");
    done.history.push(message(Role::Assistant, "Hello"));
    done.status = SessionStatus::Idle;
    done.active_request = None;

    assert_eq!(renderer.update(&done, &mut out).unwrap(), Some(Outcome::Replied));
    assert_eq!(text(&out), "Hello\n");
}

#[test]
fn reply_seen_only_at_the_end_is_printed_whole() {
    let id = Uuid::new_v4();
    let mut renderer = ReplyRenderer::new(id, 2);
    let mut out = Vec::new();

    let mut done = streaming(id, "");
    done.history.push(message(Role::Assistant, "héllo"));
    done.status = SessionStatus::Idle;
    done.active_request = None;

    assert_eq!(renderer.update(&done, &mut out).unwrap(), Some(Outcome::Replied));
    assert_eq!(text(&out), "héllo\n");
}

#[test]
fn error_prints_prefixed_line() {
    let id = Uuid::new_v4();
    let mut renderer = ReplyRenderer::new(id, 2);
    let mut out = Vec::new();
    renderer.update(&streaming(id, "Par"), &mut out).unwrap();

    let mut failed = streaming(id, "");
    failed.status = SessionStatus::Error("Rate limited".into());
    failed.active_request = None;

    assert_eq!(renderer.update(&failed, &mut out).unwrap(), Some(Outcome::Failed("Rate limited".into())));
    assert_eq!(text(&out), "Par\nERROR: Rate limited\n");
}

#[test]
fn idle_without_reply_is_cancelled() {
    let id = Uuid::new_v4();
    let mut renderer = ReplyRenderer::new(id, 2);
    let mut out = Vec::new();

    let mut idle = streaming(id, "");
    idle.status = SessionStatus::Idle;
    idle.active_request = None;

    assert_eq!(renderer.update(&idle, &mut out).unwrap(), Some(Outcome::Cancelled));
    assert_eq!(text(&out), "[cancelled]\n");
}
