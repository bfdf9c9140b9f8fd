//! End-to-end engine behavior across backing stores.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use serde_json::json;
use teraview::{Config, DiskLoader, MemoryLoader, RenderResult, SourceLoader, ViewData, ViewEngine};

const HOME: &str = "<h1>{{ title }}</h1>";
const MASTER: &str = r#"<body>{% include "content" %}</body>"#;

/// Counts loads going through any inner loader.
struct CountingLoader<L> {
    inner: L,
    loads: Arc<AtomicUsize>,
}

impl<L> CountingLoader<L> {
    fn new(inner: L) -> (Self, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                loads: loads.clone(),
            },
            loads,
        )
    }
}

impl<L: SourceLoader> SourceLoader for CountingLoader<L> {
    fn load(&self, config: &Config, name: &str) -> RenderResult<String> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(config, name)
    }
}

fn memory_templates() -> MemoryLoader {
    let mut loader = MemoryLoader::new();
    loader.add("home.html", HOME);
    loader.add("layouts/master.html", MASTER);
    loader
}

fn disk_templates() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("views/layouts")).unwrap();
    fs::write(dir.path().join("views/home.html"), HOME).unwrap();
    fs::write(dir.path().join("views/layouts/master.html"), MASTER).unwrap();
    dir
}

fn title(value: &str) -> ViewData {
    ViewData::from([("title".to_string(), json!(value))])
}

#[test]
fn same_site_renders_identically_from_every_store() {
    let expected = "<body><h1>Home</h1></body>";

    let memory = ViewEngine::with_loader(Config::default(), memory_templates()).unwrap();
    assert_eq!(memory.render("home", &title("Home")).unwrap(), expected);

    let dir = disk_templates();
    let disk =
        ViewEngine::with_loader(Config::default(), DiskLoader::with_base(dir.path())).unwrap();
    assert_eq!(disk.render("home", &title("Home")).unwrap(), expected);
}

#[cfg(feature = "archive")]
fn zip_bundle(entries: &[(&str, &str)]) -> Vec<u8> {
    use std::io::{Cursor, Write};

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for (path, source) in entries {
        writer.start_file(*path, options).unwrap();
        writer.write_all(source.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[cfg(feature = "archive")]
#[test]
fn zip_store_renders_the_same_site() {
    let bytes = zip_bundle(&[
        ("views/home.html", HOME),
        ("views/layouts/master.html", MASTER),
    ]);
    let loader = teraview::ZipLoader::new(bytes).unwrap();
    let engine = ViewEngine::with_loader(Config::default(), loader).unwrap();
    assert_eq!(
        engine.render("home", &title("Home")).unwrap(),
        "<body><h1>Home</h1></body>"
    );
}

#[test]
fn concurrent_first_renders_share_one_compile() {
    const THREADS: usize = 16;

    let (loader, loads) = CountingLoader::new(memory_templates());
    let engine = Arc::new(ViewEngine::with_loader(Config::default(), loader).unwrap());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let engine = engine.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                engine.render("home", &title("Race")).unwrap()
            })
        })
        .collect();

    let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // One compile means one load of the content and one of the master.
    assert_eq!(loads.load(Ordering::SeqCst), 2);
    assert!(outputs.iter().all(|out| out == "<body><h1>Race</h1></body>"));
}

#[test]
fn distinct_names_compile_independently() {
    let mut templates = memory_templates();
    templates.add("about.html", "about");
    let (loader, loads) = CountingLoader::new(templates);
    let engine = ViewEngine::with_loader(Config::default(), loader).unwrap();

    engine.render("home", &title("a")).unwrap();
    engine.render("about", &ViewData::new()).unwrap();
    // Two content loads plus the master loaded once per composition.
    assert_eq!(loads.load(Ordering::SeqCst), 4);

    engine.render("home", &title("b")).unwrap();
    engine.render("about", &ViewData::new()).unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 4);
}

#[test]
fn cached_render_ignores_template_edits_until_cleared() {
    let dir = disk_templates();
    let engine =
        ViewEngine::with_loader(Config::default(), DiskLoader::with_base(dir.path())).unwrap();

    assert_eq!(
        engine.render("home", &title("x")).unwrap(),
        "<body><h1>x</h1></body>"
    );

    fs::write(dir.path().join("views/home.html"), "<p>{{ title }}</p>").unwrap();
    assert_eq!(
        engine.render("home", &title("x")).unwrap(),
        "<body><h1>x</h1></body>"
    );

    engine.clear_cache();
    assert_eq!(
        engine.render("home", &title("x")).unwrap(),
        "<body><p>x</p></body>"
    );
}

#[test]
fn disable_cache_picks_up_template_edits() {
    let dir = disk_templates();
    let config = Config {
        disable_cache: true,
        ..Config::default()
    };
    let engine = ViewEngine::with_loader(config, DiskLoader::with_base(dir.path())).unwrap();

    assert_eq!(
        engine.render("home", &title("x")).unwrap(),
        "<body><h1>x</h1></body>"
    );

    fs::write(dir.path().join("views/home.html"), "<p>{{ title }}</p>").unwrap();
    assert_eq!(
        engine.render("home", &title("x")).unwrap(),
        "<body><p>x</p></body>"
    );
}

#[test]
fn failed_execution_leaves_writer_untouched() {
    let mut templates = MemoryLoader::new();
    templates.add("home.html", "{{ title }}{{ missing | upper }}");
    let config = Config {
        master: String::new(),
        ..Config::default()
    };
    let engine = ViewEngine::with_loader(config, templates).unwrap();

    let mut out = Vec::new();
    let result = engine.render_to(&mut out, "home", &title("x"));
    assert!(result.is_err());
    assert!(out.is_empty());
}
