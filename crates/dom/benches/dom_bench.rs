use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use dom::{Document, Selector, tokenize};

const SMALL_THREAD: usize = 20;
const LARGE_THREAD: usize = 5_000;

fn make_thread(comments: usize) -> String {
    let mut html = String::with_capacity(comments * 320);
    html.push_str(r#"<div id="comments"><ul>"#);
    for i in 0..comments {
        html.push_str(&format!(
            r#"<li data-comment-id="{i}" data-add-comment-url="/comment/7/"><p>comment &amp; text {i}</p><div class="grid"><button>Like</button><a href="" class="reply-btn">Reply</a><div class="reply-form-container"></div></div></li>"#
        ));
    }
    html.push_str(r#"</ul></div><input type="hidden" name="csrfmiddlewaretoken" value="tok">"#);
    html
}

fn bench_tokenize_large(c: &mut Criterion) {
    let input = make_thread(LARGE_THREAD);
    c.bench_function("bench_tokenize_large", |b| {
        b.iter(|| black_box(tokenize(black_box(&input)).len()));
    });
}

fn bench_parse_small(c: &mut Criterion) {
    let input = make_thread(SMALL_THREAD);
    c.bench_function("bench_parse_small", |b| {
        b.iter(|| black_box(Document::parse(black_box(&input)).len()));
    });
}

fn bench_closest_from_last_trigger(c: &mut Criterion) {
    let doc = Document::parse(&make_thread(LARGE_THREAD));
    let trigger = Selector::class("reply-btn");
    let group = Selector::class("grid");
    let last = doc
        .query_selector_all(&trigger)
        .last()
        .copied()
        .expect("thread has triggers");
    c.bench_function("bench_closest_from_last_trigger", |b| {
        b.iter(|| black_box(doc.closest(black_box(last), &group)));
    });
}

fn bench_clear_and_mount(c: &mut Criterion) {
    let doc = Document::parse(&make_thread(SMALL_THREAD));
    let container = doc
        .query_selector(&Selector::class("reply-form-container"))
        .expect("thread has containers");
    let form = dom::ElementBuilder::new("form")
        .attr("method", "post")
        .child(dom::ElementBuilder::new("input").attr("name", "text").build())
        .build();
    c.bench_function("bench_clear_and_mount", |b| {
        b.iter_batched(
            || doc.clone(),
            |mut doc| {
                doc.clear_children(container).expect("container is live");
                let id = doc.import(&form).expect("element imports");
                doc.append_child(container, id).expect("container accepts children");
                black_box(doc)
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_tokenize_large,
    bench_parse_small,
    bench_closest_from_last_trigger,
    bench_clear_and_mount
);
criterion_main!(benches);
