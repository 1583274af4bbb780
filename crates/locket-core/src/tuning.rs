//! Live-tuning controls derived from a game's parameters.
//!
//! Every numeric parameter gets a slider spanning `[value * 0.1, value * 3]`
//! (integers floor/ceil to whole numbers and step by 1, reals step by 0.01).
//! Anything else is shown read-only. Edits are merged back into a copy of
//! the parameters for display; nothing here writes to disk.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Slider step for real-valued parameters.
pub const REAL_STEP: f64 = 0.01;

/// Lower bound of a slider as a fraction of the original value.
pub const RANGE_MIN_FACTOR: f64 = 0.1;

/// Upper bound of a slider as a multiple of the original value.
pub const RANGE_MAX_FACTOR: f64 = 3.0;

/// Numeric edits keyed by parameter name.
pub type Edits = HashMap<String, f64>;

/// Editor for a single parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    Integer {
        min: i64,
        max: i64,
        step: i64,
        value: i64,
    },
    Real {
        min: f64,
        max: f64,
        step: f64,
        value: f64,
    },
    ReadOnly {
        value: Value,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlSpec {
    pub key: String,
    #[serde(flatten)]
    pub control: Control,
}

enum Param<'a> {
    Integer(i64),
    Real(f64),
    Opaque(&'a Value),
}

fn classify(value: &Value) -> Param<'_> {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Param::Integer(i),
            // u64 beyond i64::MAX and true floats
            (None, Some(f)) => Param::Real(f),
            (None, None) => Param::Opaque(value),
        },
        _ => Param::Opaque(value),
    }
}

/// `[floor(v * 0.1), ceil(v * 3)]`, ordered so that `min <= max`.
fn integer_range(value: i64) -> (i64, i64) {
    let lo = value.div_euclid(10);
    let hi = value.saturating_mul(3);
    (lo.min(hi), lo.max(hi))
}

fn real_range(value: f64) -> (f64, f64) {
    let lo = value * RANGE_MIN_FACTOR;
    let hi = value * RANGE_MAX_FACTOR;
    (lo.min(hi), lo.max(hi))
}

/// One control per parameter, in the parameters' key order.
pub fn derive_controls(config: &Map<String, Value>) -> Vec<ControlSpec> {
    config
        .iter()
        .map(|(key, value)| {
            let control = match classify(value) {
                Param::Integer(v) => {
                    let (min, max) = integer_range(v);
                    Control::Integer {
                        min,
                        max,
                        step: 1,
                        value: v,
                    }
                },
                Param::Real(v) => {
                    let (min, max) = real_range(v);
                    Control::Real {
                        min,
                        max,
                        step: REAL_STEP,
                        value: v,
                    }
                },
                Param::Opaque(v) => Control::ReadOnly { value: v.clone() },
            };
            ControlSpec {
                key: key.clone(),
                control,
            }
        })
        .collect()
}

/// Merge `edits` over `config`, keeping key order. Integer parameters are
/// rounded, every edit is clamped into its control's range, and edits to
/// read-only or unknown keys are ignored.
pub fn apply_edits(config: &Map<String, Value>, edits: &Edits) -> Map<String, Value> {
    for key in edits.keys().filter(|k| !config.contains_key(k.as_str())) {
        tracing::debug!(key = %key, "Ignoring edit for unknown parameter");
    }

    config
        .iter()
        .map(|(key, original)| {
            let edited = edits.get(key).copied().filter(|e| e.is_finite());
            let value = match (classify(original), edited) {
                (Param::Integer(v), Some(e)) => {
                    let (min, max) = integer_range(v);
                    Value::from((e.round() as i64).clamp(min, max))
                },
                (Param::Real(v), Some(e)) => {
                    let (min, max) = real_range(v);
                    Value::from(e.clamp(min, max))
                },
                (Param::Opaque(_), Some(_)) => {
                    tracing::debug!(key = %key, "Ignoring edit for read-only parameter");
                    original.clone()
                },
                (_, None) => original.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

/// Controls for `original` with slider positions taken from `current`.
pub fn current_controls(
    original: &Map<String, Value>,
    current: &Map<String, Value>,
) -> Vec<ControlSpec> {
    let mut controls = derive_controls(original);
    for spec in &mut controls {
        let Some(tuned) = current.get(&spec.key) else {
            continue;
        };
        match (&mut spec.control, classify(tuned)) {
            (Control::Integer { value, .. }, Param::Integer(n)) => *value = n,
            (Control::Real { value, .. }, Param::Real(f)) => *value = f,
            _ => {},
        }
    }
    controls
}

/// Apply `edits` over an earlier tuned set. Ranges always come from
/// `original`, so repeated edits cannot widen them.
pub fn accumulate_edits(
    original: &Map<String, Value>,
    previous: &Map<String, Value>,
    edits: &Edits,
) -> Map<String, Value> {
    let mut all: Edits = previous
        .iter()
        .filter_map(|(k, v)| v.as_f64().map(|f| (k.clone(), f)))
        .collect();
    all.extend(edits.iter().map(|(k, v)| (k.clone(), *v)));
    apply_edits(original, &all)
}

/// Re-apply a tuned set over `original`: keys `original` lacks are dropped,
/// new keys take their stored value, and tuned numbers are clamped again.
pub fn rebase(original: &Map<String, Value>, tuned: &Map<String, Value>) -> Map<String, Value> {
    accumulate_edits(original, tuned, &Edits::new())
}

/// Pretty JSON of a parameter set, ready to paste into `game-config.json`.
pub fn config_document(config: &Map<String, Value>) -> String {
    serde_json::to_string_pretty(config).unwrap_or_default()
}
