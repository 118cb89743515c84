//! Terminal painting of a [`ResultView`].

use std::fmt::Write as _;

use crate::{
    DownloadPanel, ErrorPanel, MessagePanel, MetricsEntry, MetricsPanel, NO_RESOURCE_DATA,
    PlotGallery, ResourcePanel, ResultView, TimingPanel,
};

/// Paints every visible panel as plain text. A hidden view paints nothing.
pub fn paint(view: &ResultView) -> String {
    let mut out = String::new();
    if !view.visible {
        return out;
    }

    if let Some(key) = &view.key_id {
        let _ = writeln!(out, "ID de clave: {}", key.key_id);
    }
    if let Some(download) = &view.download {
        paint_download(&mut out, download);
    }
    if let Some(sentence) = &view.process_time {
        let _ = writeln!(out, "{sentence}");
    }
    if let Some(metrics) = &view.metrics {
        paint_metrics(&mut out, metrics);
    }
    if let Some(timing) = &view.timing {
        paint_timing(&mut out, timing);
    }
    if let Some(plots) = &view.plots {
        paint_plots(&mut out, plots);
    }
    if let Some(message) = &view.message {
        paint_message(&mut out, message);
    }
    if let Some(error) = &view.error {
        paint_error(&mut out, error);
    }
    out
}

fn paint_download(out: &mut String, download: &DownloadPanel) {
    let _ = writeln!(out, "Archivo: {}", download.filename());
    if let Some(url) = download.download_url() {
        let _ = writeln!(out, "Descargar: {url}");
    }
    let _ = writeln!(out, "[{}]", download.playback_label());
    if download.player_visible() {
        if let Some(url) = download.playback_url() {
            let _ = writeln!(out, "Reproducir: {url}");
        }
    }
}

fn paint_metrics(out: &mut String, metrics: &MetricsPanel) {
    let _ = writeln!(out, "\nMétricas");
    for entry in &metrics.entries {
        match entry {
            MetricsEntry::Warning(reason) => {
                let _ = writeln!(out, "  ! Error al calcular métricas: {reason}");
            }
            MetricsEntry::Card(card) => {
                let _ = writeln!(out, "  {}", card.title);
                for row in &card.rows {
                    let _ = writeln!(out, "    {}: {}", row.label, row.value);
                }
            }
        }
    }
}

fn paint_timing(out: &mut String, timing: &TimingPanel) {
    if let Some(sections) = &timing.sections {
        let _ = writeln!(out, "\nTiempos de ejecución");
        for row in &sections.rows {
            let _ = writeln!(out, "  {}", row.text());
        }
        let _ = writeln!(out, "  {}", sections.total_text());
    }

    match &timing.resources {
        Some(ResourcePanel::Stats { cpu, memory }) => {
            let _ = writeln!(out, "\nUso de recursos");
            let _ = writeln!(out, "  CPU promedio: {}%", cpu.average);
            let _ = writeln!(out, "  CPU máximo: {}%", cpu.maximum);
            let _ = writeln!(out, "  Memoria promedio: {} MB", memory.average);
            let _ = writeln!(out, "  Memoria máxima: {} MB", memory.maximum);
        }
        Some(ResourcePanel::Placeholder) => {
            let _ = writeln!(out, "\nUso de recursos");
            let _ = writeln!(out, "  {NO_RESOURCE_DATA}");
        }
        None => {}
    }
}

fn paint_plots(out: &mut String, plots: &PlotGallery) {
    let _ = writeln!(out, "\nGráficos");
    for entry in &plots.entries {
        match &entry.url {
            Some(url) => {
                let _ = writeln!(out, "  {}: {url}", entry.title);
            }
            None => {
                let _ = writeln!(out, "  {}", entry.title);
            }
        }
    }
}

fn paint_message(out: &mut String, message: &MessagePanel) {
    match message {
        MessagePanel::Recovered {
            message,
            note,
            process_time,
        } => {
            let _ = writeln!(out, "Mensaje extraído:\n{message}");
            if let Some(note) = note {
                let _ = writeln!(out, "Nota: {note}");
            }
            if let Some(sentence) = process_time {
                let _ = writeln!(out, "{sentence}");
            }
        }
        MessagePanel::NothingRecovered { banner } => {
            let _ = writeln!(out, "{banner}");
        }
    }
}

fn paint_error(out: &mut String, error: &ErrorPanel) {
    let _ = writeln!(out, "Error: {}", error.message);
    if let Some(detail) = &error.detail {
        let _ = writeln!(out, "{detail}");
    }
    if let (Some(technical), Some(label)) = (&error.technical, error.technical_label()) {
        let _ = writeln!(out, "[{label}]");
        if technical.expanded {
            let _ = writeln!(out, "Ubicación: {}", technical.location);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HIDE_PLAYER_LABEL, HIDE_TECHNICAL_LABEL, PLAY_AUDIO_LABEL, SHOW_TECHNICAL_LABEL};
    use crate::{RenderContext, ServiceLinks};
    use time::{Date, Month};
    use url::Url;
    use wavhide_core::{EncodeReport, ErrorReport, SuccessReport, UploadedFileRef};

    fn context() -> RenderContext {
        RenderContext {
            links: ServiceLinks::new(Url::parse("http://localhost:8000/").expect("valid url")),
            today: Date::from_calendar_date(2024, Month::May, 9).expect("valid date"),
        }
    }

    fn error_view(location: Option<&str>) -> ResultView {
        let mut view = ResultView::new();
        view.render(
            &Err(ErrorReport {
                message: "Error al codificar mensaje".to_string(),
                detail: None,
                location: location.map(str::to_string),
                failed_attempts: vec![],
            }),
            &context(),
        );
        view
    }

    #[test]
    fn hidden_view_paints_nothing() {
        assert!(paint(&ResultView::new()).is_empty());
    }

    #[test]
    fn technical_label_follows_toggle_state() {
        let mut view = error_view(Some("lsb.py:42"));
        let collapsed = paint(&view);
        assert!(collapsed.contains(&format!("[{SHOW_TECHNICAL_LABEL}]")));
        assert!(!collapsed.contains("lsb.py:42"));

        if let Some(panel) = view.error.as_mut() {
            panel.toggle_technical();
        }
        let expanded = paint(&view);
        assert!(expanded.contains(&format!("[{HIDE_TECHNICAL_LABEL}]")));
        assert!(expanded.contains("Ubicación: lsb.py:42"));
    }

    #[test]
    fn technical_label_absent_without_location() {
        let painted = paint(&error_view(None));
        assert!(!painted.contains(SHOW_TECHNICAL_LABEL));
        assert!(!painted.contains(HIDE_TECHNICAL_LABEL));
    }

    #[test]
    fn playback_label_and_link_follow_player_toggle() {
        let mut view = ResultView::new();
        view.render(
            &Ok(SuccessReport::Encode(EncodeReport {
                file_ref: UploadedFileRef {
                    id: "stego-7".to_string(),
                },
                process_time_seconds: None,
                metrics: None,
                section_timings: None,
                resource_series: None,
                plots: vec![],
            })),
            &context(),
        );

        let hidden = paint(&view);
        assert!(hidden.contains(&format!("[{PLAY_AUDIO_LABEL}]")));
        assert!(!hidden.contains("Reproducir: "));

        if let Some(panel) = view.download.as_mut() {
            panel.toggle_playback();
        }
        let shown = paint(&view);
        assert!(shown.contains(&format!("[{HIDE_PLAYER_LABEL}]")));
        assert!(shown.contains("Reproducir: http://localhost:8000/download/stego-7"));
    }
}
