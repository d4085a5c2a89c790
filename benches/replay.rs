use criterion::{criterion_group, criterion_main, Criterion};
use image::RgbaImage;
use image_annotator::annotate::{Annotator, Point};

fn bench_replay(c: &mut Criterion) {
    let mut annotator = Annotator::default();
    annotator.bind_image(RgbaImage::new(1024, 768));
    for i in 0..200 {
        let y = (i % 700) as f32 + 10.0;
        annotator.contact_start(Point::new(10.0, y));
        for step in 1..50 {
            annotator.contact_move(Point::new(10.0 + step as f32 * 19.0, y + (step % 7) as f32));
        }
        annotator.contact_end(Point::new(1000.0, y));
    }

    c.bench_function("undo_redo_200_strokes", |b| {
        b.iter(|| {
            annotator.undo();
            annotator.redo();
        })
    });
}

criterion_group!(benches, bench_replay);
criterion_main!(benches);
