//! Display formatting shared by the renderer and the progress indicator.

use time::Date;

/// Base name used for generated artifact file names.
pub const DEFAULT_FILENAME_SLUG: &str = "audio_esteganografiado";

/// Extension forced onto every download name.
pub const WAV_EXTENSION: &str = ".wav";

/// Threshold from which durations are phrased as minutes plus seconds.
pub const MINUTES_THRESHOLD_SECONDS: f64 = 60.0;

/// Metric category and key translations.
pub const METRIC_NAMES: &[(&str, &str)] = &[
    ("mse_psnr", "MSE y PSNR"),
    ("distorsion", "Distorsión"),
    ("invisibilidad", "Invisibilidad"),
    ("entropia", "Entropía"),
    ("correlacion", "Correlación"),
    ("analisis", "Análisis"),
    ("mse", "Error Cuadrático Medio"),
    ("psnr", "Relación Señal-Ruido Pico"),
    ("snr", "Relación Señal-Ruido"),
    ("max_diff", "Diferencia Máxima"),
    ("mean_diff", "Diferencia Media"),
    ("ber", "Tasa de Error de Bits"),
    ("entropy_orig", "Entropía Original"),
    ("entropy_mod", "Entropía Modificada"),
    ("cross_corr", "Correlación Cruzada"),
    ("correlation", "Correlación"),
];

/// Plot file name translations.
pub const PLOT_NAMES: &[(&str, &str)] = &[
    ("audio_waveforms.png", "Formas de Onda"),
    ("audio_histograms.png", "Histogramas"),
    ("audio_spectrograms.png", "Espectrogramas"),
    ("audio_difference.png", "Diferencia de Audio"),
    ("frequency_distribution.png", "Distribución de Frecuencias"),
    ("audio_waveforms_librosa.png", "Formas de Onda (Librosa)"),
    ("execution_times.png", "Tiempos de Ejecución"),
    ("resource_usage.png", "Uso de Recursos (CPU y Memoria)"),
];

/// Looks `key` up in `table`, falling back to `fallback(key)` when unmapped.
pub fn translate<F>(key: &str, table: &[(&str, &str)], fallback: F) -> String
where
    F: Fn(&str) -> String,
{
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| fallback(key))
}

/// Replaces `_` with spaces and upper-cases the first letter of every word.
pub fn title_case(raw: &str) -> String {
    raw.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Human-readable metric category or key name.
pub fn metric_name(name: &str) -> String {
    translate(&name.to_lowercase(), METRIC_NAMES, |_| title_case(name))
}

/// Human-readable plot caption.
pub fn plot_name(filename: &str) -> String {
    translate(filename, PLOT_NAMES, |name| {
        title_case(name.strip_suffix(".png").unwrap_or(name))
    })
}

/// Integers render without decimals, everything else with six.
pub fn metric_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.6}")
    }
}

/// Renders a server-provided number the way it was sent (`45`, `12.5`).
pub fn plain_number(value: f64) -> String {
    format!("{value}")
}

/// Duration phrase: `"45 segundos"` below a minute, `"2 min 5 seg"` from 60 s.
pub fn duration_phrase(seconds: f64) -> String {
    if seconds >= MINUTES_THRESHOLD_SECONDS {
        let whole = seconds.round() as u64;
        format!("{} min {} seg", whole / 60, whole % 60)
    } else {
        format!("{} segundos", plain_number(seconds))
    }
}

/// Process-time sentence for a hide operation.
pub fn encode_time_sentence(seconds: f64) -> String {
    format!("El proceso tomó {}", duration_phrase(seconds))
}

/// Process-time sentence for an extract operation.
pub fn decode_time_sentence(seconds: f64) -> String {
    format!("El mensaje fue extraído en {}", duration_phrase(seconds))
}

/// Elapsed-time text used by the progress indicator.
pub fn elapsed_text(seconds: u64) -> String {
    if seconds < 60 {
        format!("{seconds} segundos...")
    } else {
        format!("{} min {} seg...", seconds / 60, seconds % 60)
    }
}

/// Default download name: `audio_esteganografiado_<day>_<month>_<year>.wav`.
pub fn default_download_filename(date: Date) -> String {
    format!(
        "{DEFAULT_FILENAME_SLUG}_{}_{}_{}{WAV_EXTENSION}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

/// Normalizes a user-typed download name so it ends in exactly one `.wav`.
///
/// Blank input falls back to `audio_esteganografiado.wav`.
pub fn normalize_download_filename(input: &str) -> String {
    let mut stem = input.trim();
    while let Some(stripped) = strip_wav_suffix(stem) {
        stem = stripped;
    }

    if stem.is_empty() {
        return format!("{DEFAULT_FILENAME_SLUG}{WAV_EXTENSION}");
    }
    format!("{stem}{WAV_EXTENSION}")
}

fn strip_wav_suffix(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(WAV_EXTENSION.len())?;
    let suffix = name.get(split..)?;
    if suffix.eq_ignore_ascii_case(WAV_EXTENSION) {
        name.get(..split)
    } else {
        None
    }
}
