//! In-memory bin filtering and the bin option lists used by the forms.

use std::collections::BTreeSet;

use crate::model::{Bin, BinId, ZoneId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Zone and type predicates over the cached bin set. `None` matches every bin.
pub struct BinFilter {
    /// Keep only bins in this zone.
    pub zone: Option<ZoneId>,
    /// Keep only bins of this type.
    pub bin_type: Option<String>,
}

impl BinFilter {
    /// Whether a bin passes both predicates.
    #[must_use]
    pub fn matches(&self, bin: &Bin) -> bool {
        let zone_ok = self.zone.is_none_or(|zone| bin.zone_id == Some(zone));
        let type_ok = self
            .bin_type
            .as_deref()
            .is_none_or(|bin_type| bin.bin_type == bin_type);
        zone_ok && type_ok
    }

    /// Bins passing the filter, in cache order.
    #[must_use]
    pub fn apply<'bins>(&self, bins: &'bins [Bin]) -> Vec<&'bins Bin> {
        bins.iter().filter(|bin| self.matches(bin)).collect()
    }
}

/// Distinct bin types of the cache, sorted.
#[must_use]
pub fn bin_types(bins: &[Bin]) -> Vec<String> {
    bins.iter()
        .map(|bin| bin.bin_type.clone())
        .filter(|bin_type| !bin_type.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Entry of a form's bin selector.
pub struct BinOption {
    /// Bin the entry stands for.
    pub bin_id: BinId,
    /// Text shown in the selector.
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Bin selector of a submission form.
pub struct BinSelector {
    options: Vec<BinOption>,
    index: usize,
}

impl BinSelector {
    /// Replace the options with the given bins and re-apply `preferred` as the
    /// current choice when it is among them.
    pub fn populate(&mut self, bins: &[Bin], preferred: Option<BinId>) {
        self.options = bins
            .iter()
            .map(|bin| BinOption {
                bin_id: bin.bin_id,
                label: format!("Bin #{} ({})", bin.bin_id, bin.bin_type),
            })
            .collect();
        self.index = 0;
        if let Some(bin_id) = preferred {
            self.select(bin_id);
        }
    }

    /// Point the selector at `bin_id` if it is one of the options.
    pub fn select(&mut self, bin_id: BinId) {
        if let Some(position) = self
            .options
            .iter()
            .position(|option| option.bin_id == bin_id)
        {
            self.index = position;
        }
    }

    /// Move to the next option, wrapping around.
    pub fn next(&mut self) {
        if !self.options.is_empty() {
            self.index = (self.index + 1) % self.options.len();
        }
    }

    /// Move to the previous option, wrapping around.
    pub fn previous(&mut self) {
        if !self.options.is_empty() {
            self.index = self
                .index
                .checked_sub(1)
                .unwrap_or(self.options.len() - 1);
        }
    }

    /// Currently chosen bin, if any options exist.
    #[must_use]
    pub fn current(&self) -> Option<BinId> {
        self.options.get(self.index).map(|option| option.bin_id)
    }

    /// Label of the current choice, or `No bins` when empty.
    #[must_use]
    pub fn label(&self) -> &str {
        self.options
            .get(self.index)
            .map_or("No bins", |option| option.label.as_str())
    }
}
