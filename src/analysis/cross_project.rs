//! Cross-project translation matching.
//!
//! For every base key of a recipient project and every target locale, look
//! for a donor translation: first under the same key, then under any donor
//! key whose default-locale text is identical. Matching is directional.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::core::{
    Action, ManagementResult, ProjectDetector, SettingsSource, TranslationManager,
    data::{TranslationGroup, TranslationKey, TranslationMap, base_groups},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Same key in the donor.
    ExactKey,
    /// Different key, identical default-locale text.
    DefaultValue,
}

impl MatchStrategy {
    pub fn confidence(self) -> f64 {
        match self {
            MatchStrategy::ExactKey => 1.0,
            MatchStrategy::DefaultValue => 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationMatch {
    pub source_key: TranslationKey,
    pub target_key: TranslationKey,
    pub locale: String,
    pub value: String,
    pub strategy: MatchStrategy,
    /// The recipient already had a value for this slot.
    pub already_filled: bool,
}

impl TranslationMatch {
    pub fn confidence(&self) -> f64 {
        self.strategy.confidence()
    }
}

impl fmt::Display for TranslationMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] <- {} ({:?})",
            self.target_key, self.locale, self.source_key, self.strategy
        )
    }
}

/// Slot counts and matches for one recipient key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMatchGroup {
    pub key: TranslationKey,
    pub filled: usize,
    pub fillable: usize,
    pub unfillable: usize,
    pub total_locales: usize,
    pub matches: Vec<TranslationMatch>,
}

impl KeyMatchGroup {
    pub fn match_rate(&self) -> f64 {
        if self.total_locales == 0 {
            return 0.0;
        }
        (self.filled + self.fillable) as f64 / self.total_locales as f64
    }
}

/// Result of matching one donor against one recipient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairAnalysis {
    pub source_project: PathBuf,
    pub target_project: PathBuf,
    pub locales: Vec<String>,
    /// Every match found, including slots the recipient already fills.
    pub matches: Vec<TranslationMatch>,
    /// Keys with at least one fillable slot.
    pub groups: Vec<KeyMatchGroup>,
    pub total_keys: usize,
    pub total_slots: usize,
    pub filled_slots: usize,
    pub fillable_slots: usize,
    /// Set when the pair could not be compared at all.
    pub skipped_reason: Option<String>,
}

impl PairAnalysis {
    fn skipped(source: &Path, target: &Path, reason: String) -> Self {
        debug!("Skipping {} -> {}: {}", source.display(), target.display(), reason);
        Self {
            source_project: source.to_path_buf(),
            target_project: target.to_path_buf(),
            skipped_reason: Some(reason),
            ..Default::default()
        }
    }

    /// Share of target slots that are filled or fillable, in `0.0..=1.0`.
    pub fn match_rate(&self) -> f64 {
        if self.total_slots == 0 {
            return 0.0;
        }
        (self.filled_slots + self.fillable_slots) as f64 / self.total_slots as f64
    }

    /// Matches for slots the recipient is missing.
    pub fn missing_matches(&self) -> impl Iterator<Item = &TranslationMatch> {
        self.matches.iter().filter(|m| !m.already_filled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyScope {
    /// Only slots the recipient is missing.
    #[default]
    MissingOnly,
    /// Every match, overwriting existing values.
    All,
}

#[derive(Debug, Clone, Default)]
pub struct ApplyOutcome {
    pub dry_run: bool,
    /// Values applied (or that would be) per locale.
    pub per_locale: BTreeMap<String, usize>,
    /// The scoped write report, when something was written.
    pub write: Option<ManagementResult>,
}

impl ApplyOutcome {
    pub fn total(&self) -> usize {
        self.per_locale.values().sum()
    }
}

/// Donor keys by default-locale text, each list sorted.
struct ValueIndex {
    by_value: HashMap<String, Vec<TranslationKey>>,
}

impl ValueIndex {
    fn build(map: &TranslationMap, default_locale: &str) -> Self {
        let mut sorted: HashMap<String, BTreeSet<TranslationKey>> = HashMap::new();
        for group in map.values() {
            let text = group.get(default_locale);
            if !text.trim().is_empty() {
                sorted
                    .entry(text.to_string())
                    .or_default()
                    .insert(group.key().clone());
            }
        }
        Self {
            by_value: sorted
                .into_iter()
                .map(|(text, keys)| (text, keys.into_iter().collect()))
                .collect(),
        }
    }

    fn candidates(&self, text: &str) -> &[TranslationKey] {
        self.by_value.get(text).map(Vec::as_slice).unwrap_or_default()
    }
}

fn filled_value<'a>(group: &'a TranslationGroup, locale: &str) -> Option<&'a str> {
    group.value(locale).filter(|v| !v.trim().is_empty())
}

fn find_match(
    donor: &TranslationMap,
    index: &ValueIndex,
    target: &TranslationGroup,
    locale: &str,
    default_locale: &str,
) -> Option<(TranslationKey, String, MatchStrategy)> {
    if let Some(group) = donor.get(target.key())
        && let Some(value) = filled_value(group, locale)
    {
        return Some((target.key().clone(), value.to_string(), MatchStrategy::ExactKey));
    }

    let text = target.get(default_locale);
    if text.trim().is_empty() {
        return None;
    }
    // Candidates are sorted, so ties go to the smallest donor key.
    index.candidates(text).iter().find_map(|key| {
        let group = donor.get(key)?;
        filled_value(group, locale)
            .map(|value| (key.clone(), value.to_string(), MatchStrategy::DefaultValue))
    })
}

/// Match `donor` against `recipient` for `locales` (default: the recipient's
/// non-default locales).
pub fn analyze_pair(
    donor: &TranslationManager,
    recipient: &TranslationManager,
    locales: Option<&[String]>,
) -> PairAnalysis {
    let source = donor.project_dir();
    let target = recipient.project_dir();
    let default_locale = recipient.default_locale();
    if donor.default_locale() != default_locale {
        return PairAnalysis::skipped(
            source,
            target,
            format!(
                "default locales differ ({} vs {})",
                donor.default_locale(),
                default_locale
            ),
        );
    }

    let locales: Vec<String> = match locales {
        Some(locales) => locales
            .iter()
            .filter(|l| l.as_str() != default_locale)
            .cloned()
            .collect(),
        None => recipient.target_locales(),
    };
    let index = ValueIndex::build(donor.translations(), default_locale);

    let mut analysis = PairAnalysis {
        source_project: source.to_path_buf(),
        target_project: target.to_path_buf(),
        locales: locales.clone(),
        ..Default::default()
    };

    for group in base_groups(recipient.translations()) {
        let mut key_group = KeyMatchGroup {
            key: group.key().clone(),
            filled: 0,
            fillable: 0,
            unfillable: 0,
            total_locales: locales.len(),
            matches: Vec::new(),
        };
        for locale in &locales {
            let already_filled = !group.is_missing(locale);
            if already_filled {
                key_group.filled += 1;
            }
            match find_match(donor.translations(), &index, group, locale, default_locale) {
                Some((source_key, value, strategy)) => {
                    if !already_filled {
                        key_group.fillable += 1;
                    }
                    key_group.matches.push(TranslationMatch {
                        source_key,
                        target_key: group.key().clone(),
                        locale: locale.clone(),
                        value,
                        strategy,
                        already_filled,
                    });
                }
                None if !already_filled => key_group.unfillable += 1,
                None => {}
            }
        }

        analysis.total_keys += 1;
        analysis.total_slots += key_group.total_locales;
        analysis.filled_slots += key_group.filled;
        analysis.fillable_slots += key_group.fillable;
        analysis.matches.extend(key_group.matches.iter().cloned());
        if key_group.fillable > 0 {
            analysis.groups.push(key_group);
        }
    }

    info!(
        "{} -> {}: {} matches, {} fillable of {} slots",
        source.display(),
        target.display(),
        analysis.matches.len(),
        analysis.fillable_slots,
        analysis.total_slots
    );
    analysis
}

/// One match per (key, locale) across analyses; higher confidence wins,
/// the earlier analysis wins ties.
pub fn consolidated_matches(analyses: &[PairAnalysis]) -> Vec<TranslationMatch> {
    let mut best: BTreeMap<(TranslationKey, String), TranslationMatch> = BTreeMap::new();
    for candidate in analyses.iter().flat_map(|a| a.matches.iter()) {
        let slot = (candidate.target_key.clone(), candidate.locale.clone());
        match best.get(&slot) {
            Some(current) if current.confidence() >= candidate.confidence() => {}
            _ => {
                best.insert(slot, candidate.clone());
            }
        }
    }
    best.into_values().collect()
}

/// Write matches into `recipient`; counts only when `dry_run`.
///
/// A real run ends with a WRITE_CATALOG scoped to the touched locales.
pub fn apply_matches(
    recipient: &mut TranslationManager,
    matches: &[TranslationMatch],
    scope: ApplyScope,
    dry_run: bool,
) -> ApplyOutcome {
    let mut outcome = ApplyOutcome {
        dry_run,
        ..Default::default()
    };

    for m in matches {
        if scope == ApplyScope::MissingOnly && m.already_filled {
            continue;
        }
        let Some(group) = recipient.translations_mut().get_mut(&m.target_key) else {
            warn!("{} is no longer in {}", m.target_key, recipient.project_dir().display());
            continue;
        };
        if scope == ApplyScope::MissingOnly && !group.is_missing(&m.locale) {
            continue;
        }
        if !dry_run {
            group.add(&m.locale, m.value.clone());
        }
        *outcome.per_locale.entry(m.locale.clone()).or_default() += 1;
    }

    if !dry_run && !outcome.per_locale.is_empty() {
        let locales: Vec<String> = outcome.per_locale.keys().cloned().collect();
        let result = recipient.manage(Action::WriteCatalog, Some(&locales));
        if !result.success {
            warn!(
                "Writing matches into {} failed: {}",
                recipient.project_dir().display(),
                result.error_message.as_deref().unwrap_or("see failed locales")
            );
        }
        outcome.write = Some(result);
    }
    outcome
}

/// Loads and caches managers so a recipient can be matched against many donors.
pub struct CrossProjectAnalyzer<'a> {
    settings: &'a dyn SettingsSource,
    detector: ProjectDetector,
    managers: HashMap<PathBuf, TranslationManager>,
}

impl<'a> CrossProjectAnalyzer<'a> {
    pub fn new(settings: &'a dyn SettingsSource) -> Self {
        Self {
            settings,
            detector: ProjectDetector::new(),
            managers: HashMap::new(),
        }
    }

    /// Load `dir` once; later calls reuse the manager.
    fn load(&mut self, dir: &Path) -> Result<(), String> {
        if self.managers.contains_key(dir) {
            return Ok(());
        }
        let settings = self.settings.settings_for(dir);
        let mut manager = TranslationManager::detect(dir, settings, &self.detector);
        let result = manager.manage(Action::CheckStatus, None);
        if !result.success {
            return Err(result
                .error_message
                .unwrap_or_else(|| "project could not be read".to_string()));
        }
        self.managers.insert(dir.to_path_buf(), manager);
        Ok(())
    }

    pub fn manager(&mut self, dir: &Path) -> Result<&mut TranslationManager, String> {
        self.load(dir)?;
        self.managers
            .get_mut(dir)
            .ok_or_else(|| format!("{} is not loaded", dir.display()))
    }

    pub fn analyze_pair(
        &mut self,
        donor: &Path,
        recipient: &Path,
        locales: Option<&[String]>,
    ) -> PairAnalysis {
        let donor_locale = self.settings.settings_for(donor).default_locale;
        let recipient_locale = self.settings.settings_for(recipient).default_locale;
        if donor_locale != recipient_locale {
            return PairAnalysis::skipped(
                donor,
                recipient,
                format!("default locales differ ({} vs {})", donor_locale, recipient_locale),
            );
        }
        if let Err(reason) = self.load(donor) {
            return PairAnalysis::skipped(donor, recipient, format!("donor unreadable: {}", reason));
        }
        if let Err(reason) = self.load(recipient) {
            return PairAnalysis::skipped(
                donor,
                recipient,
                format!("recipient unreadable: {}", reason),
            );
        }
        match (self.managers.get(donor), self.managers.get(recipient)) {
            (Some(donor), Some(recipient)) => analyze_pair(donor, recipient, locales),
            _ => PairAnalysis::skipped(donor, recipient, "project not loaded".to_string()),
        }
    }

    /// Match every donor against `recipient`, best match rate first.
    ///
    /// Pairs that were skipped or found nothing are left out.
    pub fn analyze_all(
        &mut self,
        recipient: &Path,
        donors: &[PathBuf],
        locales: Option<&[String]>,
    ) -> Vec<PairAnalysis> {
        let mut analyses: Vec<PairAnalysis> = donors
            .iter()
            .filter(|donor| donor.as_path() != recipient)
            .map(|donor| self.analyze_pair(donor, recipient, locales))
            .filter(|analysis| analysis.skipped_reason.is_none() && !analysis.matches.is_empty())
            .collect();
        analyses.sort_by(|a, b| b.match_rate().total_cmp(&a.match_rate()));
        analyses
    }

    pub fn apply(
        &mut self,
        analysis: &PairAnalysis,
        scope: ApplyScope,
        dry_run: bool,
    ) -> Result<ApplyOutcome, String> {
        let recipient = self.manager(&analysis.target_project)?;
        Ok(apply_matches(recipient, &analysis.matches, scope, dry_run))
    }

    /// Drop cached managers, e.g. after projects changed on disk.
    pub fn clear(&mut self) {
        self.managers.clear();
        self.detector.clear();
    }
}
