use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use bus::{CoreCommand, CoreEvent};
use dom::{DocPatch, DocVersion, NodeKey, PatchError};
use runtime_annotate::start_annotate_runtime;

const WAIT: Duration = Duration::from_secs(2);

fn spawn() -> (Sender<CoreCommand>, Receiver<CoreEvent>) {
    let (cmd_tx, cmd_rx) = channel();
    let (evt_tx, evt_rx) = channel();
    start_annotate_runtime(cmd_rx, evt_tx);
    (cmd_tx, evt_rx)
}

fn apply(cmd_tx: &Sender<CoreCommand>, from: u64, patches: Vec<DocPatch>) {
    cmd_tx
        .send(CoreCommand::ApplyPatches {
            from: DocVersion(from),
            to: DocVersion(from + 1),
            patches,
        })
        .expect("runtime alive");
}

fn initial_page(cmd_tx: &Sender<CoreCommand>) {
    apply(
        cmd_tx,
        0,
        vec![
            DocPatch::CreateDocument { key: NodeKey(1) },
            DocPatch::CreateElement {
                key: NodeKey(2),
                tag: "div".to_string(),
                attributes: Vec::new(),
            },
            DocPatch::CreateElement {
                key: NodeKey(3),
                tag: "i".to_string(),
                attributes: Vec::new(),
            },
            DocPatch::CreateText {
                key: NodeKey(4),
                text: "annotation.".to_string(),
            },
            DocPatch::CreateText {
                key: NodeKey(5),
                text: " body".to_string(),
            },
            DocPatch::AppendChild {
                parent: NodeKey(1),
                child: NodeKey(2),
            },
            DocPatch::AppendChild {
                parent: NodeKey(2),
                child: NodeKey(3),
            },
            DocPatch::AppendChild {
                parent: NodeKey(3),
                child: NodeKey(4),
            },
            DocPatch::AppendChild {
                parent: NodeKey(2),
                child: NodeKey(5),
            },
        ],
    );
}

fn late_annotation(cmd_tx: &Sender<CoreCommand>, from: u64, key_base: u32, text: &str) {
    apply(
        cmd_tx,
        from,
        vec![
            DocPatch::CreateText {
                key: NodeKey(key_base + 2),
                text: " more prose ".to_string(),
            },
            DocPatch::AppendChild {
                parent: NodeKey(2),
                child: NodeKey(key_base + 2),
            },
            DocPatch::CreateElement {
                key: NodeKey(key_base),
                tag: "em".to_string(),
                attributes: Vec::new(),
            },
            DocPatch::CreateText {
                key: NodeKey(key_base + 1),
                text: text.to_string(),
            },
            DocPatch::AppendChild {
                parent: NodeKey(2),
                child: NodeKey(key_base),
            },
            DocPatch::AppendChild {
                parent: NodeKey(key_base),
                child: NodeKey(key_base + 1),
            },
        ],
    );
}

fn next_complete(evt_rx: &Receiver<CoreEvent>) -> DocVersion {
    match evt_rx.recv_timeout(WAIT).expect("event before timeout") {
        CoreEvent::AnnotateComplete { version, .. } => version,
        other => panic!("expected AnnotateComplete, got {other:?}"),
    }
}

fn snapshot_text(cmd_tx: &Sender<CoreCommand>, evt_rx: &Receiver<CoreEvent>) -> String {
    cmd_tx.send(CoreCommand::Snapshot).expect("runtime alive");
    match evt_rx.recv_timeout(WAIT).expect("event before timeout") {
        CoreEvent::SnapshotText { text, .. } => text,
        other => panic!("expected SnapshotText, got {other:?}"),
    }
}

#[test]
fn document_creation_triggers_an_immediate_pass() {
    let (cmd_tx, evt_rx) = spawn();
    initial_page(&cmd_tx);

    let version = next_complete(&evt_rx);
    assert_eq!(version, DocVersion(1));
    assert_eq!(snapshot_text(&cmd_tx, &evt_rx), "[annotation]. body");
}

#[test]
fn rapid_batches_coalesce_into_one_pass() {
    let (cmd_tx, evt_rx) = spawn();
    initial_page(&cmd_tx);
    next_complete(&evt_rx);

    late_annotation(&cmd_tx, 1, 10, "first late");
    late_annotation(&cmd_tx, 2, 20, "second late");

    let version = next_complete(&evt_rx);
    assert_eq!(version, DocVersion(3));

    // No second pass for the same burst.
    assert!(
        evt_rx.recv_timeout(Duration::from_millis(300)).is_err(),
        "burst produced more than one pass"
    );

    let text = snapshot_text(&cmd_tx, &evt_rx);
    assert!(text.contains("[first late]"), "got {text:?}");
    assert!(text.contains("[second late]"), "got {text:?}");
}

#[test]
fn text_only_batches_do_not_schedule_a_pass() {
    let (cmd_tx, evt_rx) = spawn();
    initial_page(&cmd_tx);
    next_complete(&evt_rx);

    apply(
        &cmd_tx,
        1,
        vec![DocPatch::SetText {
            key: NodeKey(5),
            text: " edited body".to_string(),
        }],
    );

    assert!(
        evt_rx.recv_timeout(Duration::from_millis(300)).is_err(),
        "text edit scheduled a pass"
    );
    assert_eq!(snapshot_text(&cmd_tx, &evt_rx), "[annotation]. edited body");
}

#[test]
fn stale_batch_is_rejected() {
    let (cmd_tx, evt_rx) = spawn();
    initial_page(&cmd_tx);
    next_complete(&evt_rx);

    // Replays the initial version instead of continuing from it.
    apply(&cmd_tx, 0, vec![]);

    match evt_rx.recv_timeout(WAIT).expect("event before timeout") {
        CoreEvent::PatchRejected {
            error: PatchError::VersionMismatch { expected, got },
        } => {
            assert_eq!(expected, DocVersion(1));
            assert_eq!(got, DocVersion(0));
        }
        other => panic!("expected PatchRejected, got {other:?}"),
    }
}

#[test]
fn shutdown_stops_the_runtime() {
    let (cmd_tx, evt_rx) = spawn();
    cmd_tx.send(CoreCommand::Shutdown).expect("runtime alive");
    assert!(matches!(
        evt_rx.recv_timeout(WAIT),
        Err(std::sync::mpsc::RecvTimeoutError::Disconnected)
    ));
}
