//! The frame reconciler.
//!
//! One run walks the dataset in order and sorts every record into one of
//! three states by comparing the signature stored on its container with a
//! freshly computed one:
//!
//! | State       | Container | Action                                       |
//! |-------------|-----------|----------------------------------------------|
//! | `New`       | absent    | create, configure, write lines, sign         |
//! | `Unchanged` | signed ≡  | nothing                                      |
//! | `Changed`   | signed ≠  | configure, prune/update/append lines, sign   |
//!
//! The signature is written last, so a record that fails half way is picked
//! up again by the next run. Any error aborts the whole run; records already
//! finished stay as they are.

use tessera_core::{AxisAlign, AxisSizing, Canvas, Color, FrameProps, LayoutMode, NodeId, Padding};
use tessera_layout::{LayoutCursor, DEFAULT_GAP};
use tessera_text::FontLoader;

use crate::dataset::{Dataset, Record};
use crate::error::SyncError;
use crate::events::{progress_percent, EventSink, ProgressEvent, RunSummary};
use crate::settings::StyleSettings;
use crate::signature::signature;
use crate::synth::{plan_lines, LineOutcome, Synthesizer};

pub const FRAME_WIDTH: f32 = 650.0;
/// Height a fresh frame starts at before auto layout takes over.
pub const FRAME_INITIAL_HEIGHT: f32 = 100.0;
pub const FRAME_ITEM_SPACING: f32 = 23.0;
pub const FRAME_PADDING: Padding = Padding {
    top: 35.0,
    right: 20.0,
    bottom: 35.0,
    left: 20.0,
};

/// Fixed properties of every record frame, placed at `(0, y)`.
pub fn frame_props(background: Color, y: f32) -> FrameProps {
    FrameProps {
        x: 0.0,
        y,
        width: FRAME_WIDTH,
        height: FRAME_INITIAL_HEIGHT,
        layout_mode: LayoutMode::Vertical,
        primary_sizing: AxisSizing::Auto,
        counter_sizing: AxisSizing::Fixed,
        primary_align: AxisAlign::Center,
        counter_align: AxisAlign::Center,
        item_spacing: FRAME_ITEM_SPACING,
        padding: FRAME_PADDING,
        fill: background,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordState {
    New,
    Unchanged,
    Changed,
}

/// Result of reconciling one record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordOutcome {
    pub state: RecordState,
    /// Lines created or rewritten; kept lines with matching text are not counted.
    pub lines_written: usize,
    /// Rendered as a placeholder.
    pub missing: bool,
}

pub struct Reconciler<'a, C: Canvas + ?Sized, F: FontLoader + ?Sized, S: EventSink> {
    canvas: &'a mut C,
    fonts: &'a F,
    sink: S,
    gap: f32,
}

impl<'a, C: Canvas + ?Sized, F: FontLoader + ?Sized, S: EventSink> Reconciler<'a, C, F, S> {
    pub fn new(canvas: &'a mut C, fonts: &'a F, sink: S) -> Self {
        Self {
            canvas,
            fonts,
            sink,
            gap: DEFAULT_GAP,
        }
    }

    /// Override the vertical gap between containers.
    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Reconcile every record of `dataset` onto the page called `page_name`.
    ///
    /// Emits the full event sequence and returns the summary that went out
    /// with `BatchComplete`. On error nothing more is emitted.
    pub async fn run(
        &mut self,
        dataset: &Dataset,
        settings: &StyleSettings,
        page_name: &str,
    ) -> Result<RunSummary, SyncError> {
        let total = dataset.len();
        log::info!("Sync run: {total} record(s) onto page \"{page_name}\"");

        let synth = Synthesizer::new(self.fonts, settings)?;
        let background = settings.background()?;

        self.sink.emit(ProgressEvent::ProcessingStarted { total_count: total });
        let page = self.enter_page(page_name)?;

        let mut cursor = LayoutCursor::new(self.gap);
        let mut summary = RunSummary::default();

        for (index, record) in dataset.iter().enumerate() {
            let current = index + 1;
            self.sink.emit(ProgressEvent::RecordProcessing {
                key: record.key.clone(),
                current_index: current,
                total_count: total,
                progress_percent: progress_percent(current, total),
            });

            let outcome = match self
                .reconcile_record(page, record, settings, &synth, background, &mut cursor)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::warn!("Sync run aborted at {} ({current}/{total}): {e}", record.key);
                    return Err(e);
                }
            };
            log::debug!(
                "{}: {:?}, {} line(s) written",
                record.key,
                outcome.state,
                outcome.lines_written
            );

            match outcome.state {
                RecordState::Unchanged => {
                    summary.skipped_count += 1;
                    self.sink.emit(ProgressEvent::RecordUnchanged {
                        key: record.key.clone(),
                    });
                }
                state => {
                    let was_update = state == RecordState::Changed;
                    if was_update {
                        summary.updated_count += 1;
                    } else {
                        summary.created_count += 1;
                    }
                    self.sink.emit(ProgressEvent::RecordCreatedOrUpdated {
                        key: record.key.clone(),
                        was_update,
                    });
                }
            }

            if outcome.missing {
                summary.missing_keys.push(record.key.clone());
                self.sink.emit(ProgressEvent::MissingTranslation {
                    key: record.key.clone(),
                });
            }
            summary.total_processed += 1;
        }

        log::info!("{}", summary.message());
        self.sink.emit(ProgressEvent::BatchComplete(summary.clone()));
        Ok(summary)
    }

    fn enter_page(&mut self, page_name: &str) -> Result<NodeId, SyncError> {
        let page = match self.canvas.find_page(page_name) {
            Some(page) => {
                self.sink.emit(ProgressEvent::PageSwitched {
                    page_name: page_name.to_string(),
                });
                page
            }
            None => {
                let page = self.canvas.create_page(page_name)?;
                self.sink.emit(ProgressEvent::PageCreated {
                    page_name: page_name.to_string(),
                });
                page
            }
        };
        self.canvas.set_current_page(page)?;
        Ok(page)
    }

    async fn reconcile_record(
        &mut self,
        page: NodeId,
        record: &Record,
        settings: &StyleSettings,
        synth: &Synthesizer<'_, F>,
        background: Color,
        cursor: &mut LayoutCursor,
    ) -> Result<RecordOutcome, SyncError> {
        let name = record.container_name();
        let fresh = signature(record.primary(), record.secondary(), settings);
        let existing = self.canvas.find_container(page, &name);

        if let Some(container) = existing {
            if self.canvas.get_signature(container)?.as_deref() == Some(fresh.as_str()) {
                cursor.advance_past(&self.canvas.container_bounds(container)?);
                return Ok(RecordOutcome {
                    state: RecordState::Unchanged,
                    lines_written: 0,
                    missing: false,
                });
            }
        }

        let (container, state) = match existing {
            Some(container) => (container, RecordState::Changed),
            None => (self.canvas.create_container(page, &name)?, RecordState::New),
        };
        self.canvas
            .configure_container(container, &frame_props(background, cursor.y()))?;

        let plan = plan_lines(record);
        let current = self.canvas.list_text_lines(container)?;
        for stale in current.iter().skip(plan.lines.len()).rev() {
            self.canvas.remove_text_line(stale.id)?;
        }
        let mut lines_written = 0;
        for (i, line) in plan.lines.iter().enumerate() {
            let written = synth
                .synthesize(&mut *self.canvas, container, current.get(i), line)
                .await?;
            if written != LineOutcome::Unchanged {
                lines_written += 1;
            }
        }

        self.canvas.set_signature(container, &fresh)?;
        cursor.advance_past(&self.canvas.container_bounds(container)?);

        Ok(RecordOutcome {
            state,
            lines_written,
            missing: plan.missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCanvas;
    use tessera_text::FontCatalog;

    fn dataset() -> Dataset {
        Dataset::from_json(r#"{"DE": ["Hallo", "Welt"], "FR": ["Bonjour", ""]}"#).unwrap()
    }

    #[test]
    fn test_frame_props_constants() {
        let props = frame_props(Color::BLACK, 228.0);
        assert_eq!((props.x, props.y), (0.0, 228.0));
        assert_eq!((props.width, props.height), (650.0, 100.0));
        assert_eq!(props.layout_mode, LayoutMode::Vertical);
        assert_eq!(props.primary_sizing, AxisSizing::Auto);
        assert_eq!(props.counter_sizing, AxisSizing::Fixed);
        assert_eq!(props.item_spacing, 23.0);
        assert_eq!(props.padding.top, 35.0);
        assert_eq!(props.padding.left, 20.0);
    }

    #[tokio::test]
    async fn test_first_run_creates_everything() {
        let mut canvas = MemoryCanvas::new();
        let fonts = FontCatalog::with_defaults();
        let mut events = Vec::new();
        let summary = Reconciler::new(&mut canvas, &fonts, &mut events)
            .run(&dataset(), &StyleSettings::default(), "Copy")
            .await
            .unwrap();

        assert_eq!(summary.created_count, 2);
        assert_eq!(summary.total_processed, 2);
        assert_eq!(events[1], ProgressEvent::PageCreated { page_name: "Copy".into() });

        let de = canvas.frame("Copy", "de").unwrap();
        assert_eq!(de.children.len(), 2);
        assert_eq!(de.props.fill, Color::rgb(0x75, 0, 0));
        let fr = canvas.frame("Copy", "fr").unwrap();
        assert_eq!(fr.children.len(), 1);
        assert_eq!(fr.bounds.y, de.bounds.bottom() + DEFAULT_GAP);
    }

    #[tokio::test]
    async fn test_second_run_switches_page_and_skips() {
        let mut canvas = MemoryCanvas::new();
        let fonts = FontCatalog::with_defaults();
        let settings = StyleSettings::default();
        Reconciler::new(&mut canvas, &fonts, Vec::new())
            .run(&dataset(), &settings, "Copy")
            .await
            .unwrap();

        let mut reconciler = Reconciler::new(&mut canvas, &fonts, Vec::new());
        let summary = reconciler.run(&dataset(), &settings, "Copy").await.unwrap();
        assert_eq!(summary.skipped_count, 2);
        let events = reconciler.into_sink();
        assert_eq!(events[1], ProgressEvent::PageSwitched { page_name: "Copy".into() });
    }

    #[tokio::test]
    async fn test_record_outcome_counts_written_lines() {
        let mut canvas = MemoryCanvas::new();
        let fonts = FontCatalog::with_defaults();
        let settings = StyleSettings::default();
        let synth = Synthesizer::new(&fonts, &settings).unwrap();
        let mut reconciler = Reconciler::new(&mut canvas, &fonts, Vec::new());
        let page = reconciler.enter_page("Copy").unwrap();

        let mut outcomes = Vec::new();
        for json in [
            r#"{"DE": ["Hallo", "Welt"]}"#,
            r#"{"DE": ["Hallo", "Erde"]}"#,
            r#"{"DE": ["Hallo", "Erde"]}"#,
        ] {
            let data = Dataset::from_json(json).unwrap();
            let record = data.iter().next().unwrap();
            let mut cursor = LayoutCursor::default();
            let outcome = reconciler
                .reconcile_record(page, record, &settings, &synth, Color::BLACK, &mut cursor)
                .await
                .unwrap();
            outcomes.push((outcome.state, outcome.lines_written));
        }
        assert_eq!(
            outcomes,
            vec![
                (RecordState::New, 2),
                (RecordState::Changed, 1),
                (RecordState::Unchanged, 0),
            ]
        );
    }

    #[tokio::test]
    async fn test_custom_gap() {
        let mut canvas = MemoryCanvas::new();
        let fonts = FontCatalog::with_defaults();
        Reconciler::new(&mut canvas, &fonts, Vec::new())
            .with_gap(10.0)
            .run(&dataset(), &StyleSettings::default(), "Copy")
            .await
            .unwrap();
        let de = canvas.frame("Copy", "de").unwrap().bounds;
        let fr = canvas.frame("Copy", "fr").unwrap().bounds;
        assert_eq!(fr.y, de.bottom() + 10.0);
    }

    #[tokio::test]
    async fn test_empty_dataset_still_completes() {
        let mut canvas = MemoryCanvas::new();
        let fonts = FontCatalog::with_defaults();
        let mut events = Vec::new();
        let summary = Reconciler::new(&mut canvas, &fonts, &mut events)
            .run(&Dataset::default(), &StyleSettings::default(), "Empty")
            .await
            .unwrap();
        assert_eq!(summary, RunSummary::default());
        assert_eq!(events.len(), 3);
        assert!(matches!(events[2], ProgressEvent::BatchComplete(_)));
    }
}
