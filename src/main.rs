use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use bus::{Bus, CoreCommand, CoreEvent, channels};
use dom::{DocPatch, DocVersion, NodeKey};
use runtime_annotate::start_annotate_runtime;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() {
    env_logger::init();

    let (bus, cmd_rx) = channels();
    start_annotate_runtime(cmd_rx, bus.evt_tx.clone());

    send_sample_page(&bus);
    drain_events(&bus);
    let _ = bus.cmd_tx.send(CoreCommand::Shutdown);
}

/// A small translated-prose page: inline annotations in `i`/`em`, a verse
/// marker, and a paragraph that streams in after the initial load.
fn send_sample_page(bus: &Bus) {
    let mut next_key = 1u32;
    let mut key = || {
        let k = NodeKey(next_key);
        next_key += 1;
        k
    };

    let root = key();
    let mut patches = vec![DocPatch::CreateDocument { key: root }];

    let p1 = key();
    patches.push(DocPatch::CreateElement {
        key: p1,
        tag: "p".to_string(),
        attributes: Vec::new(),
    });
    patches.push(DocPatch::AppendChild {
        parent: root,
        child: p1,
    });
    append_element(&mut patches, &mut key, p1, "i", "(11)");
    append_text(&mut patches, &mut key, p1, " And the sky ");
    append_element(&mut patches, &mut key, p1, "i", "he raised.");
    append_text(&mut patches, &mut key, p1, " It holds ");
    append_element(&mut patches, &mut key, p1, "em", "a balance,");
    append_text(&mut patches, &mut key, p1, " they said");
    append_element(&mut patches, &mut key, p1, "i", "really?");

    let from = DocVersion::INITIAL;
    let _ = bus.cmd_tx.send(CoreCommand::ApplyPatches {
        from,
        to: from.next(),
        patches,
    });

    // Late content, the way a host streams it in.
    let p2 = key();
    let mut patches = vec![DocPatch::CreateElement {
        key: p2,
        tag: "p".to_string(),
        attributes: Vec::new(),
    }];
    patches.push(DocPatch::AppendChild {
        parent: root,
        child: p2,
    });
    append_element(&mut patches, &mut key, p2, "i", "an aside");
    append_text(&mut patches, &mut key, p2, " ");
    append_element(&mut patches, &mut key, p2, "i", "continued");

    let from = from.next();
    let _ = bus.cmd_tx.send(CoreCommand::ApplyPatches {
        from,
        to: from.next(),
        patches,
    });
}

fn append_element(
    patches: &mut Vec<DocPatch>,
    key: &mut impl FnMut() -> NodeKey,
    parent: NodeKey,
    tag: &str,
    text: &str,
) {
    let el = key();
    patches.push(DocPatch::CreateElement {
        key: el,
        tag: tag.to_string(),
        attributes: Vec::new(),
    });
    patches.push(DocPatch::AppendChild { parent, child: el });
    append_text(patches, key, el, text);
}

fn append_text(
    patches: &mut Vec<DocPatch>,
    key: &mut impl FnMut() -> NodeKey,
    parent: NodeKey,
    text: &str,
) {
    let t = key();
    patches.push(DocPatch::CreateText {
        key: t,
        text: text.to_string(),
    });
    patches.push(DocPatch::AppendChild { parent, child: t });
}

fn drain_events(bus: &Bus) {
    let mut passes = 0u32;
    loop {
        match bus.evt_rx.recv_timeout(Duration::from_millis(500)) {
            Ok(CoreEvent::AnnotateComplete { version, stats }) => {
                passes += 1;
                log::info!(target: "bracketeer", "pass {passes} at {version:?}: {stats:?}");
                let _ = bus.cmd_tx.send(CoreCommand::Snapshot);
            }
            Ok(CoreEvent::SnapshotText { version, text }) => {
                println!("{version:?}: {text}");
            }
            Ok(CoreEvent::PatchRejected { error }) => {
                log::error!(target: "bracketeer", "patch batch rejected: {error:?}");
                break;
            }
            Err(RecvTimeoutError::Timeout) if passes >= 2 => break,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
