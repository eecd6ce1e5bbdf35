//! End-to-end runs of the reconciler against the in-memory canvas.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tessera_core::{Canvas, CanvasError, Color, FontName};
use tessera_store::DocumentStore;
use tessera_sync::{
    Dataset, FormSettings, IncomingMessage, MemoryCanvas, OutgoingMessage, Plugin, ProgressEvent,
    Reconciler, Record, RunSummary, SettingsStore, StyleSettings, SyncError,
};
use tessera_text::{FontCatalog, FontError, FontLoader, LoadedFonts};

const PAGE: &str = "Translations";

fn dataset(json: &str) -> Dataset {
    Dataset::from_json(json).unwrap()
}

fn countries() -> Dataset {
    dataset(r#"{"DE": ["Hallo", "Welt"], "FR": ["Bonjour", "le monde"], "IT": ["Ciao", ""]}"#)
}

async fn run(canvas: &mut MemoryCanvas, data: &Dataset, settings: &StyleSettings) -> RunSummary {
    let fonts = FontCatalog::with_defaults();
    Reconciler::new(canvas, &fonts, Vec::new())
        .run(data, settings, PAGE)
        .await
        .unwrap()
}

/// Delegates to the default catalog but fails every load after `limit`.
struct FlakyFonts {
    catalog: FontCatalog,
    calls: AtomicUsize,
    limit: usize,
}

impl FlakyFonts {
    fn new(limit: usize) -> Self {
        Self {
            catalog: FontCatalog::with_defaults(),
            calls: AtomicUsize::new(0),
            limit,
        }
    }
}

#[async_trait]
impl FontLoader for FlakyFonts {
    async fn load_font(&self, font: &FontName) -> Result<(), FontError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= self.limit {
            return Err(FontError::LoadFailed {
                font: font.clone(),
                reason: "host timed out".into(),
            });
        }
        self.catalog.load_font(font).await
    }
}

#[tokio::test]
async fn test_second_identical_run_mutates_nothing() {
    let mut canvas = MemoryCanvas::new();
    let settings = StyleSettings::default();
    let first = run(&mut canvas, &countries(), &settings).await;
    assert_eq!(first.created_count, 3);

    let before = canvas.node_mutations();
    let second = run(&mut canvas, &countries(), &settings).await;
    assert_eq!(canvas.node_mutations(), before);
    assert_eq!(second.skipped_count, second.total_processed);
    assert_eq!((second.created_count, second.updated_count), (0, 0));
}

#[tokio::test]
async fn test_style_change_updates_every_frame() {
    let mut canvas = MemoryCanvas::new();
    let mut settings = StyleSettings::default();
    run(&mut canvas, &countries(), &settings).await;

    settings.background_color = "#000000".into();
    let summary = run(&mut canvas, &countries(), &settings).await;
    assert_eq!(summary.updated_count, 3);
    assert_eq!(summary.skipped_count, 0);
    assert_eq!(canvas.frame(PAGE, "de").unwrap().props.fill, Color::BLACK);
}

#[tokio::test]
async fn test_surrounding_whitespace_does_not_trigger_update() {
    let mut canvas = MemoryCanvas::new();
    let settings = StyleSettings::default();
    run(&mut canvas, &dataset(r#"{"US": ["Hello", "World"]}"#), &settings).await;

    let summary = run(&mut canvas, &dataset(r#"{"US": ["  Hello  ", "World "]}"#), &settings).await;
    assert_eq!(summary.skipped_count, 1);
}

#[tokio::test]
async fn test_first_keyword_wins() {
    let mut canvas = MemoryCanvas::new();
    let mut settings = StyleSettings::default();
    settings.keyword.keywords = "sale, today".into();
    settings.keyword.font_weight = "Bold".into();
    settings.keyword.font_size = Some(44);
    run(&mut canvas, &dataset(r#"{"UK": ["sale today", "tomorrow"]}"#), &settings).await;

    let frame = canvas.frame(PAGE, "uk").unwrap();
    let highlighted = &frame.children[0].style;
    assert_eq!(highlighted.font, FontName::new("Poppins", "Bold"));
    assert_eq!(highlighted.font_size, 44.0);
    assert_eq!(highlighted.line_height, 36.0);

    let plain = &frame.children[1].style;
    assert_eq!(plain.font, FontName::new("Poppins", "Regular"));
    assert_eq!(plain.font_size, 30.0);
}

#[tokio::test]
async fn test_blank_record_gets_single_placeholder() {
    let mut canvas = MemoryCanvas::new();
    let mut settings = StyleSettings::default();
    settings.primary.font_size = Some(28);
    let summary = run(&mut canvas, &dataset(r#"{"BE": ["", "  "], "NL": ["Hallo", ""]}"#), &settings).await;

    assert_eq!(summary.missing_keys, vec!["BE".to_string()]);
    let frame = canvas.frame(PAGE, "be").unwrap();
    assert_eq!(frame.children.len(), 1);
    assert_eq!(frame.children[0].characters, "BE translation missing!");
    assert_eq!(frame.children[0].style.font_size, 28.0);
}

#[tokio::test]
async fn test_frames_stack_with_fixed_gap() {
    let mut canvas = MemoryCanvas::new();
    let mut settings = StyleSettings::default();
    settings.primary.line_height = Some(30);
    settings.secondary.line_height = Some(27);
    settings.keyword.keywords = "sale".into();
    settings.keyword.line_height = Some(50);

    // Heights: 70 + 30 = 100, 70 + 30 + 23 + 27 = 150, 70 + 50 = 120.
    let data = dataset(r#"{"A": ["One", ""], "B": ["Two", "Three"], "C": ["Big sale", ""]}"#);
    run(&mut canvas, &data, &settings).await;

    let bounds = |name: &str| canvas.frame(PAGE, name).unwrap().bounds;
    assert_eq!((bounds("a").y, bounds("a").height), (0.0, 100.0));
    assert_eq!((bounds("b").y, bounds("b").height), (228.0, 150.0));
    assert_eq!((bounds("c").y, bounds("c").height), (506.0, 120.0));
    assert!(canvas.frame(PAGE, "a").unwrap().bounds.x == 0.0);
}

#[tokio::test]
async fn test_shrinking_record_drops_trailing_line() {
    let mut canvas = MemoryCanvas::new();
    let settings = StyleSettings::default();
    run(&mut canvas, &dataset(r#"{"DE": ["Hallo", "Welt"]}"#), &settings).await;
    let first_line = canvas.frame(PAGE, "de").unwrap().children[0].id;

    let summary = run(&mut canvas, &dataset(r#"{"DE": ["Servus", ""]}"#), &settings).await;
    assert_eq!(summary.updated_count, 1);

    let frame = canvas.frame(PAGE, "de").unwrap();
    assert_eq!(frame.children.len(), 1);
    assert_eq!(frame.children[0].id, first_line);
    assert_eq!(frame.children[0].characters, "Servus");
    assert_eq!(frame.bounds.height, 106.0);
}

#[tokio::test]
async fn test_emptied_record_becomes_placeholder() {
    let mut canvas = MemoryCanvas::new();
    let settings = StyleSettings::default();
    run(&mut canvas, &dataset(r#"{"DE": ["Hallo", "Welt"]}"#), &settings).await;
    let first_line = canvas.frame(PAGE, "de").unwrap().children[0].id;

    let summary = run(&mut canvas, &dataset(r#"{"DE": ["", " "]}"#), &settings).await;
    assert_eq!(summary.updated_count, 1);
    assert_eq!(summary.missing_keys, vec!["DE".to_string()]);

    let frame = canvas.frame(PAGE, "de").unwrap();
    assert_eq!(frame.children.len(), 1);
    assert_eq!(frame.children[0].id, first_line);
    assert_eq!(frame.children[0].characters, "DE translation missing!");
}

#[tokio::test]
async fn test_growing_record_appends_line() {
    let mut canvas = MemoryCanvas::new();
    let settings = StyleSettings::default();
    run(&mut canvas, &dataset(r#"{"ES": ["Hola", ""]}"#), &settings).await;
    let kept = canvas.frame(PAGE, "es").unwrap().children[0].clone();

    run(&mut canvas, &dataset(r#"{"ES": ["Hola", "Mundo"]}"#), &settings).await;
    let frame = canvas.frame(PAGE, "es").unwrap();
    assert_eq!(frame.children.len(), 2);
    assert_eq!(frame.children[0], kept);
    assert_eq!(frame.children[1].characters, "Mundo");
}

#[tokio::test]
async fn test_events_follow_record_order() {
    let mut canvas = MemoryCanvas::new();
    let fonts = FontCatalog::with_defaults();
    let mut events = Vec::new();
    Reconciler::new(&mut canvas, &fonts, &mut events)
        .run(&dataset(r#"{"DE": ["Hallo", "Welt"], "BE": ["", ""]}"#), &StyleSettings::default(), PAGE)
        .await
        .unwrap();

    assert_eq!(
        events,
        vec![
            ProgressEvent::ProcessingStarted { total_count: 2 },
            ProgressEvent::PageCreated { page_name: PAGE.into() },
            ProgressEvent::RecordProcessing {
                key: "DE".into(),
                current_index: 1,
                total_count: 2,
                progress_percent: 50,
            },
            ProgressEvent::RecordCreatedOrUpdated { key: "DE".into(), was_update: false },
            ProgressEvent::RecordProcessing {
                key: "BE".into(),
                current_index: 2,
                total_count: 2,
                progress_percent: 100,
            },
            ProgressEvent::RecordCreatedOrUpdated { key: "BE".into(), was_update: false },
            ProgressEvent::MissingTranslation { key: "BE".into() },
            ProgressEvent::BatchComplete(RunSummary {
                created_count: 2,
                updated_count: 0,
                skipped_count: 0,
                missing_keys: vec!["BE".into()],
                total_processed: 2,
            }),
        ]
    );
}

#[tokio::test]
async fn test_skipped_frames_keep_their_position() {
    let mut canvas = MemoryCanvas::new();
    let settings = StyleSettings::default();
    run(&mut canvas, &countries(), &settings).await;
    let it_before = canvas.frame(PAGE, "it").unwrap().bounds;

    let reordered = dataset(r#"{"IT": ["Ciao", ""], "DE": ["Hallo", "Welt"], "FR": ["Bonjour", "le monde"]}"#);
    let summary = run(&mut canvas, &reordered, &settings).await;
    assert_eq!(summary.skipped_count, 3);
    assert_eq!(canvas.frame(PAGE, "it").unwrap().bounds, it_before);
}

#[tokio::test]
async fn test_changed_frame_moves_to_cursor() {
    let mut canvas = MemoryCanvas::new();
    let settings = StyleSettings::default();
    run(&mut canvas, &countries(), &settings).await;

    let moved = dataset(r#"{"IT": ["Ciao!", ""]}"#);
    run(&mut canvas, &moved, &settings).await;
    assert_eq!(canvas.frame(PAGE, "it").unwrap().bounds.y, 0.0);
}

#[tokio::test]
async fn test_font_failure_aborts_run_and_keeps_finished_records() {
    let mut canvas = MemoryCanvas::new();
    // DE needs two loads (one per line); FR fails on its first.
    let fonts = FlakyFonts::new(2);
    let mut events = Vec::new();
    let err = Reconciler::new(&mut canvas, &fonts, &mut events)
        .run(&countries(), &StyleSettings::default(), PAGE)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::FontLoad(FontError::LoadFailed { .. })));
    assert!(!events.iter().any(|e| matches!(e, ProgressEvent::BatchComplete(_))));
    assert_eq!(
        events.last(),
        Some(&ProgressEvent::RecordProcessing {
            key: "FR".into(),
            current_index: 2,
            total_count: 3,
            progress_percent: 67,
        })
    );

    let page = canvas.find_page(PAGE).unwrap();
    let de = canvas.find_container(page, "de").unwrap();
    let fr = canvas.find_container(page, "fr").unwrap();
    assert!(canvas.get_signature(de).unwrap().is_some());
    assert_eq!(canvas.get_signature(fr).unwrap(), None);
    assert!(canvas.find_container(page, "it").is_none());

    let summary = run(&mut canvas, &countries(), &StyleSettings::default()).await;
    assert_eq!(
        (summary.skipped_count, summary.updated_count, summary.created_count),
        (1, 1, 1)
    );
}

#[tokio::test]
async fn test_text_edit_without_loaded_font_is_a_mutation_failure() {
    let mut canvas = MemoryCanvas::new().with_font_guard(LoadedFonts::new());
    let fonts = FontCatalog::with_defaults();
    let err = Reconciler::new(&mut canvas, &fonts, Vec::new())
        .run(&countries(), &StyleSettings::default(), PAGE)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SyncError::NodeMutation(CanvasError::FontNotLoaded(_))
    ));
}

#[tokio::test]
async fn test_shared_font_guard_accepts_loaded_fonts() {
    let fonts = FontCatalog::with_defaults();
    let mut canvas = MemoryCanvas::new().with_font_guard(fonts.loaded());
    let summary = Reconciler::new(&mut canvas, &fonts, Vec::new())
        .run(&countries(), &StyleSettings::default(), PAGE)
        .await
        .unwrap();
    assert_eq!(summary.created_count, 3);
}

#[tokio::test]
async fn test_signatures_survive_a_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(dir.path().join("doc.tsr"));
    let settings = StyleSettings::default();

    let mut canvas = MemoryCanvas::from_document(store.load_or_default().unwrap());
    run(&mut canvas, &countries(), &settings).await;
    store.save(canvas.document()).unwrap();

    let mut reopened = MemoryCanvas::from_document(store.load_or_default().unwrap());
    let summary = run(&mut reopened, &countries(), &settings).await;
    assert_eq!(summary.skipped_count, 3);
    assert_eq!(reopened.node_mutations(), 0);
}

#[tokio::test]
async fn test_records_added_later_stack_below() {
    let mut canvas = MemoryCanvas::new();
    let settings = StyleSettings::default();
    run(&mut canvas, &countries(), &settings).await;

    let mut more = countries();
    more.push(Record::new("PT", "Olá", "Mundo"));
    let summary = run(&mut canvas, &more, &settings).await;
    assert_eq!((summary.skipped_count, summary.created_count), (3, 1));

    let it = canvas.frame(PAGE, "it").unwrap().bounds;
    assert_eq!(canvas.frame(PAGE, "pt").unwrap().bounds.y, it.bottom() + 128.0);
}

#[tokio::test]
async fn test_plugin_reports_font_failure_as_single_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::open(dir.path()).unwrap();
    let (mut plugin, mut rx) = Plugin::new(MemoryCanvas::new(), FontCatalog::empty(), store);

    let mut data = indexmap::IndexMap::new();
    data.insert("DE".to_string(), vec!["Hallo".to_string(), "Welt".to_string()]);
    plugin
        .handle(IncomingMessage::CreateFrames {
            data,
            settings: FormSettings {
                spreadsheet_tab: "Sheet1".into(),
                data_range: "A1:C2".into(),
                ..FormSettings::default()
            },
            page_name: PAGE.into(),
        })
        .await;

    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    let errors: Vec<_> = out.iter().filter(|m| m.is_error()).collect();
    assert_eq!(
        errors,
        vec![&OutgoingMessage::error(
            "Error creating frames: Font family \"Poppins\" is not available"
        )]
    );
    assert!(!out.iter().any(|m| matches!(m, OutgoingMessage::FramesCreated { .. })));
    assert!(matches!(out.last(), Some(OutgoingMessage::Error { .. })));
}

#[tokio::test]
async fn test_plugin_renders_sizes_with_units() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::open(dir.path()).unwrap();
    let (mut plugin, mut rx) = Plugin::new(MemoryCanvas::new(), FontCatalog::with_defaults(), store);

    let mut data = indexmap::IndexMap::new();
    data.insert("DE".to_string(), vec!["Hallo".to_string(), "Welt".to_string()]);
    plugin
        .handle(IncomingMessage::CreateFrames {
            data,
            settings: FormSettings {
                spreadsheet_tab: "Sheet1".into(),
                data_range: "A1:C2".into(),
                primary_font_size: "36px".into(),
                secondary_font_size: "abc".into(),
                ..FormSettings::default()
            },
            page_name: PAGE.into(),
        })
        .await;

    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    assert!(!out.iter().any(OutgoingMessage::is_error));
    let frame = plugin.canvas().frame(PAGE, "de").unwrap();
    assert_eq!(frame.children[0].style.font_size, 36.0);
    assert_eq!(frame.children[1].style.font_size, 30.0);
}
