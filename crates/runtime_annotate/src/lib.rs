use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use annotator::run_pass;
use bus::{CoreCommand, CoreEvent};
use dom::VersionedDocument;
use dom::text::visible_text;

const DEBOUNCE: Duration = Duration::from_millis(100);

pub fn start_annotate_runtime(cmd_rx: Receiver<CoreCommand>, evt_tx: Sender<CoreEvent>) {
    thread::spawn(move || {
        let mut state = VersionedDocument::new();
        // Pending pass deadline. Re-armed on every element-creating batch.
        let mut deadline: Option<Instant> = None;

        loop {
            let cmd = match deadline {
                Some(at) => {
                    let now = Instant::now();
                    if now >= at {
                        deadline = None;
                        run_and_report(&mut state, &evt_tx);
                        continue;
                    }
                    match cmd_rx.recv_timeout(at - now) {
                        Ok(cmd) => cmd,
                        Err(RecvTimeoutError::Timeout) => continue,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match cmd_rx.recv() {
                    Ok(cmd) => cmd,
                    Err(_) => break,
                },
            };

            match cmd {
                CoreCommand::ApplyPatches { from, to, patches } => {
                    match state.apply(from, to, &patches) {
                        Ok(summary) => {
                            if summary.created_document {
                                deadline = None;
                                run_and_report(&mut state, &evt_tx);
                            } else if summary.created_elements > 0 {
                                deadline = Some(Instant::now() + DEBOUNCE);
                            }
                        }
                        Err(error) => {
                            log::warn!(target: "annotate.runtime", "rejected patch batch {from:?}..{to:?}: {error:?}");
                            let _ = evt_tx.send(CoreEvent::PatchRejected { error });
                        }
                    }
                }
                CoreCommand::Snapshot => {
                    let _ = evt_tx.send(CoreEvent::SnapshotText {
                        version: state.version(),
                        text: visible_text(state.document()),
                    });
                }
                CoreCommand::Shutdown => break,
            }
        }
    });
}

fn run_and_report(state: &mut VersionedDocument, evt_tx: &Sender<CoreEvent>) {
    let stats = run_pass(state.document_mut());
    log::debug!(target: "annotate.runtime", "pass at {:?}: {stats:?}", state.version());
    let _ = evt_tx.send(CoreEvent::AnnotateComplete {
        version: state.version(),
        stats,
    });
}
