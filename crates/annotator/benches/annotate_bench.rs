use annotator::run_pass;
use criterion::{Criterion, criterion_group, criterion_main};
use dom::{Document, NodeKey};
use std::hint::black_box;

const ROOT: NodeKey = NodeKey(1);

fn build_page(paragraphs: usize) -> Document {
    let mut doc = Document::new();
    doc.init_root(ROOT).expect("fresh root");
    for n in 0..paragraphs {
        let p = doc.create_element("p", Vec::new());
        doc.append_child(ROOT, p).expect("attach paragraph");

        let i = doc.create_element("i", Vec::new());
        doc.append_child(p, i).expect("attach emphasis");
        let t = doc.create_text(&format!("note {n}."));
        doc.append_child(i, t).expect("attach note text");

        let body = doc.create_text(" body text follows the note ");
        doc.append_child(p, body).expect("attach body text");

        let em = doc.create_element("em", Vec::new());
        doc.append_child(p, em).expect("attach emphasis");
        let t = doc.create_text("aside?");
        doc.append_child(em, t).expect("attach aside text");
    }
    doc
}

fn bench_run_pass(c: &mut Criterion) {
    for paragraphs in [10, 100, 1_000] {
        let doc = build_page(paragraphs);
        c.bench_function(&format!("run_pass/{paragraphs}p"), |b| {
            b.iter(|| {
                let mut doc = doc.clone();
                black_box(run_pass(&mut doc))
            });
        });
    }
}

fn bench_rerun_on_processed(c: &mut Criterion) {
    let mut doc = build_page(100);
    run_pass(&mut doc);
    c.bench_function("run_pass/100p-processed", |b| {
        b.iter(|| {
            let mut doc = doc.clone();
            black_box(run_pass(&mut doc))
        });
    });
}

criterion_group!(benches, bench_run_pass, bench_rerun_on_processed);
criterion_main!(benches);
