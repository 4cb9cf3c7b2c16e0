use annotator::PassStats;
use dom::{DocPatch, DocVersion, PatchError};
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug)]
pub enum CoreCommand {
    // Host -> annotate runtime (patch stream)
    ApplyPatches {
        from: DocVersion,
        to: DocVersion,
        patches: Vec<DocPatch>,
    },
    Snapshot,
    Shutdown,
}

#[derive(Debug)]
pub enum CoreEvent {
    // Annotate runtime -> host
    AnnotateComplete {
        version: DocVersion,
        stats: PassStats,
    },
    SnapshotText {
        version: DocVersion,
        text: String,
    },
    PatchRejected {
        error: PatchError,
    },
}

pub struct Bus {
    pub cmd_tx: Sender<CoreCommand>,
    pub evt_rx: Receiver<CoreEvent>,
    pub evt_tx: Sender<CoreEvent>, // shareable for runtimes
}

pub fn channels() -> (Bus, Receiver<CoreCommand>) {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (evt_tx, evt_rx) = mpsc::channel();
    (
        Bus {
            cmd_tx,
            evt_rx,
            evt_tx,
        },
        cmd_rx,
    )
}
