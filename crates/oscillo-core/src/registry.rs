//! Measurement registry.
//!
//! A registry owns gauge families (name + help + fixed label names) and the
//! latest value of every series inside them. All state sits behind a single
//! `RwLock`, so a snapshot always reflects whole writes: a `set` or a batch of
//! writes is visible entirely or not at all.
//!
//! Registries are explicit values. Cloning a `Registry` yields another handle
//! to the same state; `Registry::new()` yields an independent one.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{OscilloError, Result};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a registered gauge family.
///
/// Handles are bound to the registry that issued them; using one against a
/// different registry is rejected with `UnknownFamily`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeHandle {
    registry_id: u64,
    name: Arc<str>,
    arity: usize,
}

impl GaugeHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of label values `set` expects.
    pub fn arity(&self) -> usize {
        self.arity
    }
}

#[derive(Debug)]
struct Family {
    help: String,
    label_names: Vec<String>,
    series: BTreeMap<Vec<String>, f64>,
}

struct RegistryInner {
    id: u64,
    families: RwLock<BTreeMap<String, Family>>,
}

#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("id", &self.inner.id)
            .field("families", &self.families())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
                families: RwLock::new(BTreeMap::new()),
            }),
        }
    }

    /// Declare a gauge family.
    ///
    /// Registering the same name again with identical help and label names
    /// returns an equal handle. Any other schema for an existing name fails
    /// with `DuplicateRegistration` and leaves the existing family untouched.
    pub fn register(&self, name: &str, help: &str, label_names: &[&str]) -> Result<GaugeHandle> {
        validate_metric_name(name)?;
        for (i, label) in label_names.iter().enumerate() {
            validate_label_name(label)?;
            if label_names[..i].contains(label) {
                return Err(OscilloError::InvalidName(format!(
                    "duplicate label name {label} in {name}"
                )));
            }
        }

        let mut families = self.inner.families.write().unwrap_or_else(PoisonError::into_inner);
        match families.entry(name.to_string()) {
            Entry::Occupied(e) => {
                let f = e.get();
                let same_labels = f
                    .label_names
                    .iter()
                    .map(String::as_str)
                    .eq(label_names.iter().copied());
                if f.help != help || !same_labels {
                    return Err(OscilloError::DuplicateRegistration {
                        name: name.to_string(),
                    });
                }
            }
            Entry::Vacant(e) => {
                e.insert(Family {
                    help: help.to_string(),
                    label_names: label_names.iter().map(|s| s.to_string()).collect(),
                    series: BTreeMap::new(),
                });
                tracing::debug!(name, labels = ?label_names, "gauge family registered");
            }
        }

        Ok(GaugeHandle {
            registry_id: self.inner.id,
            name: Arc::from(name),
            arity: label_names.len(),
        })
    }

    /// Create or update one series.
    pub fn set(&self, handle: &GaugeHandle, label_values: &[&str], value: f64) -> Result<()> {
        let mut batch = Batch::new();
        batch.set(handle, label_values, value);
        self.apply(batch)
    }

    /// Apply all staged writes under one exclusive region.
    ///
    /// Every write is validated first; if any fails, nothing is applied.
    pub fn apply(&self, batch: Batch<'_>) -> Result<()> {
        if batch.writes.is_empty() {
            return Ok(());
        }

        let mut families = self.inner.families.write().unwrap_or_else(PoisonError::into_inner);
        for w in &batch.writes {
            self.check(&families, w.handle, w.label_values.len())?;
        }
        for w in batch.writes {
            if let Some(f) = families.get_mut(w.handle.name()) {
                f.series.insert(w.label_values, w.value);
            }
        }
        Ok(())
    }

    fn check(
        &self,
        families: &BTreeMap<String, Family>,
        handle: &GaugeHandle,
        got: usize,
    ) -> Result<()> {
        let family = (handle.registry_id == self.inner.id)
            .then(|| families.get(handle.name()))
            .flatten()
            .ok_or_else(|| OscilloError::UnknownFamily(handle.name().to_string()))?;
        let expected = family.label_names.len();
        if expected != got {
            return Err(OscilloError::LabelArityMismatch {
                name: handle.name().to_string(),
                expected,
                got,
            });
        }
        Ok(())
    }

    /// Point-in-time copy of every family and series.
    pub fn snapshot(&self) -> Snapshot {
        let families = self.inner.families.read().unwrap_or_else(PoisonError::into_inner);
        Snapshot {
            families: families
                .iter()
                .map(|(name, f)| FamilySnapshot {
                    name: name.clone(),
                    help: f.help.clone(),
                    label_names: f.label_names.clone(),
                    series: f
                        .series
                        .iter()
                        .map(|(values, v)| Series { label_values: values.clone(), value: *v })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Registered family names, sorted.
    pub fn families(&self) -> Vec<String> {
        let families = self.inner.families.read().unwrap_or_else(PoisonError::into_inner);
        families.keys().cloned().collect()
    }
}

struct StagedWrite<'h> {
    handle: &'h GaugeHandle,
    label_values: Vec<String>,
    value: f64,
}

/// Writes staged for `Registry::apply`.
#[derive(Default)]
pub struct Batch<'h> {
    writes: Vec<StagedWrite<'h>>,
}

impl<'h> Batch<'h> {
    pub fn new() -> Self {
        Self { writes: Vec::new() }
    }

    pub fn set(&mut self, handle: &'h GaugeHandle, label_values: &[&str], value: f64) -> &mut Self {
        self.writes.push(StagedWrite {
            handle,
            label_values: label_values.iter().map(|s| s.to_string()).collect(),
            value,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label_values: Vec<String>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FamilySnapshot {
    pub name: String,
    pub help: String,
    pub label_names: Vec<String>,
    /// Ordered by label values.
    pub series: Vec<Series>,
}

/// One flattened series from a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<'a> {
    pub name: &'a str,
    pub labels: Vec<(&'a str, &'a str)>,
    pub value: f64,
    pub help: &'a str,
}

/// Consistent view of a registry, families ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    families: Vec<FamilySnapshot>,
}

impl Snapshot {
    pub fn families(&self) -> &[FamilySnapshot] {
        &self.families
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample<'_>> {
        self.families.iter().flat_map(|f| {
            f.series.iter().map(move |s| Sample {
                name: &f.name,
                labels: f
                    .label_names
                    .iter()
                    .map(String::as_str)
                    .zip(s.label_values.iter().map(String::as_str))
                    .collect(),
                value: s.value,
                help: &f.help,
            })
        })
    }

    /// Value of one series, if present.
    pub fn get(&self, name: &str, label_values: &[&str]) -> Option<f64> {
        let family = self.families.iter().find(|f| f.name == name)?;
        family
            .series
            .iter()
            .find(|s| s.label_values.iter().map(String::as_str).eq(label_values.iter().copied()))
            .map(|s| s.value)
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

/// Metric names: `[a-zA-Z_:][a-zA-Z0-9_:]*`.
pub fn validate_metric_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let ok = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
        }
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(OscilloError::InvalidName(format!("metric name {name:?}")))
    }
}

/// Label names: `[a-zA-Z_][a-zA-Z0-9_]*`, `__` prefix reserved.
pub fn validate_label_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let ok = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if ok && !name.starts_with("__") {
        Ok(())
    } else {
        Err(OscilloError::InvalidName(format!("label name {name:?}")))
    }
}
