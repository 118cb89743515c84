#![warn(missing_docs)]
//! # wavhide-ui
//!
//! ## Purpose
//! Defines the user-facing surfaces of `wavhide`: the result panels, the
//! progress indicator and the submit-control gate.
//!
//! ## Responsibilities
//! - Build a [`ResultView`] from one workflow outcome, resetting every panel
//!   first so repeated renders never accumulate stale content.
//! - Format metrics, timings, resource statistics and plot captions.
//! - Track interactive toggles (technical details, audio player).
//! - Paint the view as terminal text ([`paint`]).
//!
//! ## Data flow
//! Orchestrator outcome -> [`ResultView::render`] -> panels -> [`paint`].
//!
//! ## Ownership and lifetimes
//! Panels own their strings and URLs; the view never borrows from the report
//! it was rendered from.
//!
//! ## Error model
//! Rendering never fails. Telemetry that cannot be displayed (mismatched
//! resource series, unusable plot names) degrades to placeholders.

pub mod format;
mod paint;
pub mod progress;

use time::Date;
use url::Url;
use wavhide_clipboard::Clipboard;
use wavhide_core::{
    DecodeReport, DecodeResult, EncodeReport, ErrorReport, MetricEntry, MetricScalar,
    MetricsReport, PlotRef, ResourceSeries, SectionTimings, SuccessReport,
};
use wavhide_transport::{download_url, plot_url};

pub use paint::paint;

/// Banner shown when an extract call recovered nothing.
pub const NOTHING_RECOVERED_BANNER: &str = "No se pudo extraer ningún mensaje.";

/// Placeholder shown when resource samples are missing or inconsistent.
pub const NO_RESOURCE_DATA: &str = "No hay datos de recursos disponibles";

/// Toggle label while technical details are hidden.
pub const SHOW_TECHNICAL_LABEL: &str = "Mostrar detalles técnicos";

/// Toggle label while technical details are visible.
pub const HIDE_TECHNICAL_LABEL: &str = "Ocultar detalles técnicos";

/// Player toggle label while the player is hidden.
pub const PLAY_AUDIO_LABEL: &str = "Reproducir Audio";

/// Player toggle label while the player is visible.
pub const HIDE_PLAYER_LABEL: &str = "Ocultar Reproductor";

/// Feedback after a successful key-id copy.
pub const COPIED_LABEL: &str = "Copiado";

/// Feedback after a failed key-id copy.
pub const COPY_FAILED_LABEL: &str =
    "No se pudo copiar el texto. Intente seleccionarlo manualmente.";

/// Submit-control gate. Both controls are disabled while an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitControls {
    /// Hide-form submit control.
    pub encode_enabled: bool,
    /// Extract-form submit control.
    pub decode_enabled: bool,
}

impl SubmitControls {
    /// Creates enabled controls.
    pub fn new() -> Self {
        Self {
            encode_enabled: true,
            decode_enabled: true,
        }
    }

    /// Disables both controls. Returns `false` when an operation already holds
    /// them.
    pub fn acquire(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.encode_enabled = false;
        self.decode_enabled = false;
        true
    }

    /// Re-enables both controls.
    pub fn release(&mut self) {
        self.encode_enabled = true;
        self.decode_enabled = true;
    }

    /// Returns `true` when a new operation may be submitted.
    pub fn can_submit(&self) -> bool {
        self.encode_enabled && self.decode_enabled
    }
}

impl Default for SubmitControls {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds links to server-hosted artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLinks {
    base: Url,
}

impl ServiceLinks {
    /// Creates links relative to a normalized service base URL.
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Download link with a `filename` hint.
    pub fn download(&self, file_id: &str, filename: &str) -> Option<Url> {
        download_url(&self.base, file_id, Some(filename)).ok()
    }

    /// Streaming link used by the audio player.
    pub fn playback(&self, file_id: &str) -> Option<Url> {
        download_url(&self.base, file_id, None).ok()
    }

    /// Full-size plot image link.
    pub fn plot(&self, filename: &str) -> Option<Url> {
        plot_url(&self.base, filename).ok()
    }
}

/// Inputs the renderer needs besides the outcome itself.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Link builder for the configured service.
    pub links: ServiceLinks,
    /// Date used for the default download name.
    pub today: Date,
}

/// Copyable key id of a hide operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyIdPanel {
    /// Key id (the produced artifact id).
    pub key_id: String,
}

impl KeyIdPanel {
    /// Copies the key id and returns the feedback label to show.
    pub fn copy_to(&self, clipboard: &mut dyn Clipboard) -> &'static str {
        if clipboard.copy(&self.key_id) {
            COPIED_LABEL
        } else {
            COPY_FAILED_LABEL
        }
    }
}

/// Download and playback controls for the produced artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPanel {
    links: ServiceLinks,
    file_id: String,
    filename: String,
    download_url: Option<Url>,
    playback_url: Option<Url>,
    player_visible: bool,
}

impl DownloadPanel {
    fn new(links: &ServiceLinks, file_id: &str, filename: String) -> Self {
        Self {
            links: links.clone(),
            file_id: file_id.to_string(),
            download_url: links.download(file_id, &filename),
            playback_url: links.playback(file_id),
            filename,
            player_visible: false,
        }
    }

    /// Artifact id.
    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    /// Effective download file name.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Download link carrying the effective file name.
    pub fn download_url(&self) -> Option<&Url> {
        self.download_url.as_ref()
    }

    /// Player source link.
    pub fn playback_url(&self) -> Option<&Url> {
        self.playback_url.as_ref()
    }

    /// Applies a user-typed name, forcing a single `.wav` extension.
    pub fn rename(&mut self, input: &str) {
        self.filename = format::normalize_download_filename(input);
        self.download_url = self.links.download(&self.file_id, &self.filename);
    }

    /// Shows or hides the audio player.
    pub fn toggle_playback(&mut self) {
        self.player_visible = !self.player_visible;
    }

    /// Returns `true` while the player is visible.
    pub fn player_visible(&self) -> bool {
        self.player_visible
    }

    /// Label of the player toggle for the current state.
    pub fn playback_label(&self) -> &'static str {
        if self.player_visible {
            HIDE_PLAYER_LABEL
        } else {
            PLAY_AUDIO_LABEL
        }
    }
}

/// One `label: value` line of a metric card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRow {
    /// Translated key.
    pub label: String,
    /// Formatted value.
    pub value: String,
}

/// One metric category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCard {
    /// Translated category name.
    pub title: String,
    /// Rows in server order.
    pub rows: Vec<MetricRow>,
}

/// Entry of the metrics panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsEntry {
    /// Server-side metrics failure.
    Warning(String),
    /// Metric category card.
    Card(MetricCard),
}

/// Metrics panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsPanel {
    /// Entries in display order.
    pub entries: Vec<MetricsEntry>,
}

impl MetricsPanel {
    fn build(report: &MetricsReport) -> Self {
        let entries = match report {
            MetricsReport::Unavailable(reason) => vec![MetricsEntry::Warning(reason.clone())],
            MetricsReport::Values(tree) => tree
                .iter()
                .map(|(category, entry)| {
                    let rows = match entry {
                        MetricEntry::Scalar(value) => vec![MetricRow {
                            label: "Valor".to_string(),
                            value: metric_value(value),
                        }],
                        MetricEntry::Group(values) => values
                            .iter()
                            .map(|(key, value)| MetricRow {
                                label: format::metric_name(key),
                                value: metric_value(value),
                            })
                            .collect(),
                    };
                    MetricsEntry::Card(MetricCard {
                        title: format::metric_name(category),
                        rows,
                    })
                })
                .collect(),
        };
        Self { entries }
    }

    /// Number of warning entries.
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, MetricsEntry::Warning(_)))
            .count()
    }
}

fn metric_value(value: &MetricScalar) -> String {
    match value {
        MetricScalar::Number(number) => format::metric_number(*number),
        MetricScalar::Text(text) => text.clone(),
    }
}

/// One section timing row.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRow {
    /// Section label as sent by the server.
    pub name: String,
    /// Section seconds.
    pub seconds: f64,
}

impl TimingRow {
    /// `"<name>  <seconds>s"`.
    pub fn text(&self) -> String {
        format!("{}  {}s", self.name, format::plain_number(self.seconds))
    }
}

/// Section timing table with its computed total.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTable {
    /// Rows in insertion order.
    pub rows: Vec<TimingRow>,
    /// Sum of all row seconds.
    pub total: f64,
}

impl SectionTable {
    fn build(timings: &SectionTimings) -> Self {
        Self {
            rows: timings
                .0
                .iter()
                .map(|(name, seconds)| TimingRow {
                    name: name.clone(),
                    seconds: *seconds,
                })
                .collect(),
            total: timings.total(),
        }
    }

    /// Total row, fixed to four decimals.
    pub fn total_text(&self) -> String {
        format!("Tiempo Total: {:.4}s", self.total)
    }
}

/// Average and maximum of one resource series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesStats {
    /// Average, two decimals.
    pub average: String,
    /// Maximum, two decimals.
    pub maximum: String,
}

impl SeriesStats {
    fn of(values: &[f64]) -> Self {
        let average = values.iter().sum::<f64>() / values.len() as f64;
        let maximum = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            average: format!("{average:.2}"),
            maximum: format!("{maximum:.2}"),
        }
    }
}

/// Resource usage section of the timing panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourcePanel {
    /// CPU percent and memory MB statistics.
    Stats {
        /// CPU statistics.
        cpu: SeriesStats,
        /// Memory statistics.
        memory: SeriesStats,
    },
    /// Explicit "no resource data" placeholder.
    Placeholder,
}

impl ResourcePanel {
    fn build(series: &ResourceSeries) -> Self {
        if !series.is_usable() {
            return Self::Placeholder;
        }
        Self::Stats {
            cpu: SeriesStats::of(&series.cpu_percent),
            memory: SeriesStats::of(&series.memory_mb),
        }
    }
}

/// Timing and resource panel.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingPanel {
    /// Section table, when timings were reported.
    pub sections: Option<SectionTable>,
    /// Resource statistics, when resource usage was reported.
    pub resources: Option<ResourcePanel>,
}

/// One plot thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotEntry {
    /// Server file name.
    pub filename: String,
    /// Caption.
    pub title: String,
    /// Full-size image link.
    pub url: Option<Url>,
}

/// Diagnostic plot gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotGallery {
    /// Entries in server order.
    pub entries: Vec<PlotEntry>,
}

impl PlotGallery {
    fn build(plots: &[PlotRef], links: &ServiceLinks) -> Self {
        Self {
            entries: plots
                .iter()
                .map(|plot| PlotEntry {
                    filename: plot.filename.clone(),
                    title: format::plot_name(&plot.filename),
                    url: links.plot(&plot.filename),
                })
                .collect(),
        }
    }

    /// Full-size link of the entry at `index` (the "click" action).
    pub fn open(&self, index: usize) -> Option<&Url> {
        self.entries.get(index)?.url.as_ref()
    }
}

/// Extract result panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePanel {
    /// Recovered message with optional note and time sentence.
    Recovered {
        /// Extracted message.
        message: String,
        /// Advisory note.
        note: Option<String>,
        /// Process-time sentence.
        process_time: Option<String>,
    },
    /// Fixed negative-result banner.
    NothingRecovered {
        /// Banner text.
        banner: String,
    },
}

/// Collapsible technical details of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicalDetails {
    /// Diagnostic location.
    pub location: String,
    /// Whether the location is currently shown.
    pub expanded: bool,
}

/// Error panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    /// Concise message.
    pub message: String,
    /// Detail, with failed attempts appended.
    pub detail: Option<String>,
    /// Technical toggle, present only when a location was reported.
    pub technical: Option<TechnicalDetails>,
}

impl ErrorPanel {
    fn build(report: &ErrorReport) -> Self {
        let detail = report.detail.as_ref().map(|detail| {
            let mut text = detail.clone();
            if !report.failed_attempts.is_empty() {
                text.push_str("\n\nIntentos fallidos:");
                for attempt in &report.failed_attempts {
                    text.push_str("\n- ");
                    text.push_str(attempt);
                }
            }
            text
        });

        Self {
            message: report.message.clone(),
            detail,
            technical: report.location.as_ref().map(|location| TechnicalDetails {
                location: location.clone(),
                expanded: false,
            }),
        }
    }

    /// Flips technical-details visibility. No-op without a location.
    pub fn toggle_technical(&mut self) {
        if let Some(technical) = self.technical.as_mut() {
            technical.expanded = !technical.expanded;
        }
    }

    /// Toggle label for the current state; `None` when the toggle is hidden.
    pub fn technical_label(&self) -> Option<&'static str> {
        self.technical.as_ref().map(|technical| {
            if technical.expanded {
                HIDE_TECHNICAL_LABEL
            } else {
                SHOW_TECHNICAL_LABEL
            }
        })
    }
}

/// Every output surface of one rendered outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultView {
    /// Whether the result area is shown at all.
    pub visible: bool,
    /// Key id of a hide operation.
    pub key_id: Option<KeyIdPanel>,
    /// Download/playback panel.
    pub download: Option<DownloadPanel>,
    /// Hide process-time sentence.
    pub process_time: Option<String>,
    /// Metrics panel.
    pub metrics: Option<MetricsPanel>,
    /// Timing/resource panel.
    pub timing: Option<TimingPanel>,
    /// Plot gallery.
    pub plots: Option<PlotGallery>,
    /// Extract result.
    pub message: Option<MessagePanel>,
    /// Error panel.
    pub error: Option<ErrorPanel>,
}

impl ResultView {
    /// Creates an empty, hidden view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hides and empties every panel.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Renders one outcome, replacing whatever was shown before.
    pub fn render(&mut self, outcome: &Result<SuccessReport, ErrorReport>, ctx: &RenderContext) {
        self.clear();
        self.visible = true;

        match outcome {
            Ok(SuccessReport::Encode(report)) => self.render_encode(report, ctx),
            Ok(SuccessReport::Decode(report)) => self.render_decode(report),
            Err(report) => self.error = Some(ErrorPanel::build(report)),
        }
    }

    fn render_encode(&mut self, report: &EncodeReport, ctx: &RenderContext) {
        let file_id = &report.file_ref.id;
        self.key_id = Some(KeyIdPanel {
            key_id: file_id.clone(),
        });
        self.download = Some(DownloadPanel::new(
            &ctx.links,
            file_id,
            format::default_download_filename(ctx.today),
        ));
        self.process_time = report
            .process_time_seconds
            .map(format::encode_time_sentence);
        self.metrics = report.metrics.as_ref().map(MetricsPanel::build);

        if report.section_timings.is_some() || report.resource_series.is_some() {
            self.timing = Some(TimingPanel {
                sections: report.section_timings.as_ref().map(SectionTable::build),
                resources: report.resource_series.as_ref().map(ResourcePanel::build),
            });
        }

        if !report.plots.is_empty() {
            self.plots = Some(PlotGallery::build(&report.plots, &ctx.links));
        }
    }

    fn render_decode(&mut self, report: &DecodeReport) {
        self.message = Some(match &report.result {
            DecodeResult::Recovered { message, note } => MessagePanel::Recovered {
                message: message.clone(),
                note: note.clone(),
                process_time: report
                    .process_time_seconds
                    .map(format::decode_time_sentence),
            },
            DecodeResult::NothingRecovered => MessagePanel::NothingRecovered {
                banner: NOTHING_RECOVERED_BANNER.to_string(),
            },
        });
    }
}
