//! Folder configuration value object
//!
//! Parses the qualifier suffix of a resource folder (`values-en-rUS`,
//! `drawable-sw600dp-land-hdpi`, `values-b+kok+IN`) into facets and answers
//! configuration-matching questions for resolution.
//!
//! Qualifiers must appear in canonical order:
//! locale, layout direction, smallest width, width, height, screen size,
//! orientation, ui mode, night mode, density, version.

use std::fmt;

/// Locale facet (`en`, `en-rUS`, `b+sr+Latn+RS`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    pub language: String,
    pub script: Option<String>,
    pub region: Option<String>,
    /// Written with the `b+` BCP-47 syntax
    pub bcp47: bool,
}

impl Locale {
    pub fn new(language: impl Into<String>, region: Option<&str>) -> Self {
        Self {
            language: language.into(),
            script: None,
            region: region.map(str::to_string),
            bcp47: false,
        }
    }

    fn parse(segment: &str, next: Option<&str>) -> Option<(Self, usize)> {
        if let Some(tag) = segment.strip_prefix("b+") {
            return Self::parse_bcp47(tag).map(|locale| (locale, 1));
        }
        if segment.len() != 2 || !segment.chars().all(|c| c.is_ascii_lowercase()) {
            return None;
        }
        let mut locale = Locale::new(segment, None);
        if let Some(region) = next.and_then(parse_region_segment) {
            locale.region = Some(region);
            return Some((locale, 2));
        }
        Some((locale, 1))
    }

    fn parse_bcp47(tag: &str) -> Option<Self> {
        let mut parts = tag.split('+');
        let language = parts.next()?;
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let mut locale = Locale {
            language: language.to_ascii_lowercase(),
            script: None,
            region: None,
            bcp47: true,
        };
        for part in parts {
            let is_script = part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic());
            let is_region = (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
                || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()));
            if is_script && locale.script.is_none() && locale.region.is_none() {
                let mut script = part.to_ascii_lowercase();
                script[..1].make_ascii_uppercase();
                locale.script = Some(script);
            } else if is_region && locale.region.is_none() {
                locale.region = Some(part.to_ascii_uppercase());
            } else {
                return None;
            }
        }
        Some(locale)
    }

    fn matches(&self, reference: &Locale) -> bool {
        if !self.language.eq_ignore_ascii_case(&reference.language) {
            return false;
        }
        match (&self.region, &reference.region) {
            (Some(mine), Some(theirs)) => mine.eq_ignore_ascii_case(theirs),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bcp47 {
            write!(f, "b+{}", self.language)?;
            if let Some(script) = &self.script {
                write!(f, "+{script}")?;
            }
            if let Some(region) = &self.region {
                write!(f, "+{region}")?;
            }
            return Ok(());
        }
        f.write_str(&self.language)?;
        if let Some(region) = &self.region {
            write!(f, "-r{region}")?;
        }
        Ok(())
    }
}

fn parse_region_segment(segment: &str) -> Option<String> {
    let region = segment.strip_prefix('r')?;
    let valid = (region.len() == 2 && region.chars().all(|c| c.is_ascii_uppercase()))
        || (region.len() == 3 && region.chars().all(|c| c.is_ascii_digit()));
    valid.then(|| region.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayoutDirection {
    Ltr,
    Rtl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScreenSize {
    Small,
    Normal,
    Large,
    XLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Portrait,
    Landscape,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UiMode {
    Car,
    Desk,
    Television,
    Appliance,
    Watch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NightMode {
    Night,
    NotNight,
}

/// Screen density facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Density {
    Dpi(u32),
    NoDpi,
    AnyDpi,
}

impl Density {
    pub const LOW: Density = Density::Dpi(120);
    pub const MEDIUM: Density = Density::Dpi(160);
    pub const TV: Density = Density::Dpi(213);
    pub const HIGH: Density = Density::Dpi(240);
    pub const XHIGH: Density = Density::Dpi(320);
    pub const XXHIGH: Density = Density::Dpi(480);
    pub const XXXHIGH: Density = Density::Dpi(640);

    const NAMED: [(&'static str, u32); 7] = [
        ("ldpi", 120),
        ("mdpi", 160),
        ("tvdpi", 213),
        ("hdpi", 240),
        ("xhdpi", 320),
        ("xxhdpi", 480),
        ("xxxhdpi", 640),
    ];

    fn parse(segment: &str) -> Option<Self> {
        match segment {
            "nodpi" => return Some(Density::NoDpi),
            "anydpi" => return Some(Density::AnyDpi),
            _ => {}
        }
        if let Some((_, dpi)) = Self::NAMED.iter().find(|(name, _)| *name == segment) {
            return Some(Density::Dpi(*dpi));
        }
        parse_number(segment, "", "dpi").map(Density::Dpi)
    }

    /// Ranking used to pick the closest density; lower is better.
    fn distance(&self, reference: u32) -> u64 {
        match self {
            Density::AnyDpi => 0,
            Density::Dpi(dpi) if *dpi >= reference => 1 + u64::from(dpi - reference),
            // Scaling up a lower density looks worse than scaling down.
            Density::Dpi(dpi) => 100_000 + u64::from(reference - dpi),
            Density::NoDpi => u64::MAX,
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Density::NoDpi => f.write_str("nodpi"),
            Density::AnyDpi => f.write_str("anydpi"),
            Density::Dpi(dpi) => match Self::NAMED.iter().find(|(_, value)| value == dpi) {
                Some((name, _)) => f.write_str(name),
                None => write!(f, "{dpi}dpi"),
            },
        }
    }
}

fn parse_number(segment: &str, prefix: &str, suffix: &str) -> Option<u32> {
    let digits = segment.strip_prefix(prefix)?.strip_suffix(suffix)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Configuration facets of a resource folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct FolderConfiguration {
    pub locale: Option<Locale>,
    pub layout_direction: Option<LayoutDirection>,
    pub smallest_width: Option<u32>,
    pub screen_width: Option<u32>,
    pub screen_height: Option<u32>,
    pub screen_size: Option<ScreenSize>,
    pub orientation: Option<Orientation>,
    pub ui_mode: Option<UiMode>,
    pub night_mode: Option<NightMode>,
    pub density: Option<Density>,
    pub version: Option<u32>,
}

const FACET_COUNT: usize = 11;

impl FolderConfiguration {
    /// Parse a `-`-separated qualifier string. Empty means the default
    /// configuration. Unknown or out-of-order segments yield `None`.
    pub fn from_qualifier_str(qualifiers: &str) -> Option<Self> {
        let mut config = FolderConfiguration::default();
        if qualifiers.is_empty() {
            return Some(config);
        }

        let segments: Vec<&str> = qualifiers.split('-').collect();
        let mut facet = 0;
        let mut index = 0;
        while index < segments.len() {
            let segment = segments[index];
            let next = segments.get(index + 1).copied();
            let mut consumed = None;
            while facet < FACET_COUNT && consumed.is_none() {
                consumed = config.apply(facet, segment, next);
                facet += 1;
            }
            index += consumed?;
        }
        Some(config)
    }

    /// Parse the qualifiers of a folder name such as `values-en-rUS`.
    pub fn from_folder_name(folder: &str) -> Option<Self> {
        match folder.split_once('-') {
            Some((_, qualifiers)) => Self::from_qualifier_str(qualifiers),
            None => Some(FolderConfiguration::default()),
        }
    }

    fn apply(&mut self, facet: usize, segment: &str, next: Option<&str>) -> Option<usize> {
        match facet {
            0 => {
                let (locale, consumed) = Locale::parse(segment, next)?;
                self.locale = Some(locale);
                Some(consumed)
            }
            1 => {
                self.layout_direction = Some(match segment {
                    "ldltr" => LayoutDirection::Ltr,
                    "ldrtl" => LayoutDirection::Rtl,
                    _ => return None,
                });
                Some(1)
            }
            2 => {
                self.smallest_width = Some(parse_number(segment, "sw", "dp")?);
                Some(1)
            }
            3 => {
                self.screen_width = Some(parse_number(segment, "w", "dp")?);
                Some(1)
            }
            4 => {
                self.screen_height = Some(parse_number(segment, "h", "dp")?);
                Some(1)
            }
            5 => {
                self.screen_size = Some(match segment {
                    "small" => ScreenSize::Small,
                    "normal" => ScreenSize::Normal,
                    "large" => ScreenSize::Large,
                    "xlarge" => ScreenSize::XLarge,
                    _ => return None,
                });
                Some(1)
            }
            6 => {
                self.orientation = Some(match segment {
                    "port" => Orientation::Portrait,
                    "land" => Orientation::Landscape,
                    "square" => Orientation::Square,
                    _ => return None,
                });
                Some(1)
            }
            7 => {
                self.ui_mode = Some(match segment {
                    "car" => UiMode::Car,
                    "desk" => UiMode::Desk,
                    "television" => UiMode::Television,
                    "appliance" => UiMode::Appliance,
                    "watch" => UiMode::Watch,
                    _ => return None,
                });
                Some(1)
            }
            8 => {
                self.night_mode = Some(match segment {
                    "night" => NightMode::Night,
                    "notnight" => NightMode::NotNight,
                    _ => return None,
                });
                Some(1)
            }
            9 => {
                self.density = Some(Density::parse(segment)?);
                Some(1)
            }
            10 => {
                self.version = Some(parse_number(segment, "v", "")?);
                Some(1)
            }
            _ => None,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == FolderConfiguration::default()
    }

    /// Canonical qualifier string, without a leading `-`.
    pub fn qualifier_string(&self) -> String {
        let mut segments: Vec<String> = Vec::new();
        if let Some(locale) = &self.locale {
            segments.push(locale.to_string());
        }
        if let Some(direction) = self.layout_direction {
            segments.push(
                match direction {
                    LayoutDirection::Ltr => "ldltr",
                    LayoutDirection::Rtl => "ldrtl",
                }
                .to_string(),
            );
        }
        if let Some(sw) = self.smallest_width {
            segments.push(format!("sw{sw}dp"));
        }
        if let Some(w) = self.screen_width {
            segments.push(format!("w{w}dp"));
        }
        if let Some(h) = self.screen_height {
            segments.push(format!("h{h}dp"));
        }
        if let Some(size) = self.screen_size {
            segments.push(
                match size {
                    ScreenSize::Small => "small",
                    ScreenSize::Normal => "normal",
                    ScreenSize::Large => "large",
                    ScreenSize::XLarge => "xlarge",
                }
                .to_string(),
            );
        }
        if let Some(orientation) = self.orientation {
            segments.push(
                match orientation {
                    Orientation::Portrait => "port",
                    Orientation::Landscape => "land",
                    Orientation::Square => "square",
                }
                .to_string(),
            );
        }
        if let Some(mode) = self.ui_mode {
            segments.push(
                match mode {
                    UiMode::Car => "car",
                    UiMode::Desk => "desk",
                    UiMode::Television => "television",
                    UiMode::Appliance => "appliance",
                    UiMode::Watch => "watch",
                }
                .to_string(),
            );
        }
        if let Some(night) = self.night_mode {
            segments.push(
                match night {
                    NightMode::Night => "night",
                    NightMode::NotNight => "notnight",
                }
                .to_string(),
            );
        }
        if let Some(density) = self.density {
            segments.push(density.to_string());
        }
        if let Some(version) = self.version {
            segments.push(format!("v{version}"));
        }
        segments.join("-")
    }

    /// Folder name for `folder_type` with these qualifiers.
    pub fn folder_name(&self, folder_type: &str) -> String {
        let qualifiers = self.qualifier_string();
        if qualifiers.is_empty() {
            folder_type.to_string()
        } else {
            format!("{folder_type}-{qualifiers}")
        }
    }

    /// Whether a resource in this folder can be used on a device described
    /// by `reference`. Facets the reference leaves open always match.
    pub fn is_match_for(&self, reference: &FolderConfiguration) -> bool {
        fn facet<T>(mine: &Option<T>, theirs: &Option<T>, ok: impl Fn(&T, &T) -> bool) -> bool {
            match (mine, theirs) {
                (Some(mine), Some(theirs)) => ok(mine, theirs),
                _ => true,
            }
        }

        facet(&self.locale, &reference.locale, Locale::matches)
            && facet(&self.layout_direction, &reference.layout_direction, |a, b| a == b)
            && facet(&self.smallest_width, &reference.smallest_width, |a, b| a <= b)
            && facet(&self.screen_width, &reference.screen_width, |a, b| a <= b)
            && facet(&self.screen_height, &reference.screen_height, |a, b| a <= b)
            && facet(&self.screen_size, &reference.screen_size, |a, b| a <= b)
            && facet(&self.orientation, &reference.orientation, |a, b| a == b)
            && facet(&self.ui_mode, &reference.ui_mode, |a, b| a == b)
            && facet(&self.night_mode, &reference.night_mode, |a, b| a == b)
            && facet(&self.version, &reference.version, |a, b| a <= b)
    }

    /// Index of the configuration in `candidates` that best matches
    /// `reference`, or `None` when nothing is compatible.
    pub fn find_best_match<'a, I>(candidates: I, reference: &FolderConfiguration) -> Option<usize>
    where
        I: IntoIterator<Item = &'a FolderConfiguration>,
    {
        let candidates: Vec<&FolderConfiguration> = candidates.into_iter().collect();
        let mut remaining: Vec<usize> = (0..candidates.len())
            .filter(|&i| candidates[i].is_match_for(reference))
            .collect();

        if let Some(locale) = &reference.locale {
            narrow(&mut remaining, |i| candidates[i].locale.is_some());
            if locale.region.is_some() {
                narrow(&mut remaining, |i| {
                    candidates[i].locale.as_ref().is_some_and(|l| l.region.is_some())
                });
            }
        }
        if reference.layout_direction.is_some() {
            narrow(&mut remaining, |i| candidates[i].layout_direction.is_some());
        }
        if reference.smallest_width.is_some() {
            keep_largest(&mut remaining, |i| candidates[i].smallest_width);
        }
        if reference.screen_width.is_some() {
            keep_largest(&mut remaining, |i| candidates[i].screen_width);
        }
        if reference.screen_height.is_some() {
            keep_largest(&mut remaining, |i| candidates[i].screen_height);
        }
        if reference.screen_size.is_some() {
            keep_largest(&mut remaining, |i| candidates[i].screen_size);
        }
        if reference.orientation.is_some() {
            narrow(&mut remaining, |i| candidates[i].orientation.is_some());
        }
        if reference.ui_mode.is_some() {
            narrow(&mut remaining, |i| candidates[i].ui_mode.is_some());
        }
        if reference.night_mode.is_some() {
            narrow(&mut remaining, |i| candidates[i].night_mode.is_some());
        }
        let reference_dpi = match reference.density {
            Some(Density::Dpi(dpi)) => dpi,
            _ => 160,
        };
        if let Some(best) = remaining
            .iter()
            .filter_map(|&i| candidates[i].density.map(|d| d.distance(reference_dpi)))
            .min()
        {
            remaining.retain(|&i| {
                candidates[i]
                    .density
                    .is_some_and(|d| d.distance(reference_dpi) == best)
            });
        }
        if reference.version.is_some() {
            keep_largest(&mut remaining, |i| candidates[i].version);
        }

        // Facets the reference leaves open favour the most generic folder.
        remaining
            .into_iter()
            .min_by_key(|&i| candidates[i].facet_count())
    }

    /// Number of facets this configuration specifies.
    pub fn facet_count(&self) -> usize {
        [
            self.locale.is_some(),
            self.layout_direction.is_some(),
            self.smallest_width.is_some(),
            self.screen_width.is_some(),
            self.screen_height.is_some(),
            self.screen_size.is_some(),
            self.orientation.is_some(),
            self.ui_mode.is_some(),
            self.night_mode.is_some(),
            self.density.is_some(),
            self.version.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}

/// Keep only candidates satisfying `has`, unless none does.
fn narrow(remaining: &mut Vec<usize>, has: impl Fn(usize) -> bool) {
    if remaining.iter().any(|&i| has(i)) {
        remaining.retain(|&i| has(i));
    }
}

/// Keep only candidates with the largest value of a facet, unless none has it.
fn keep_largest<T: Ord + Copy>(remaining: &mut Vec<usize>, value: impl Fn(usize) -> Option<T>) {
    if let Some(best) = remaining.iter().filter_map(|&i| value(i)).max() {
        remaining.retain(|&i| value(i) == Some(best));
    }
}

impl fmt::Display for FolderConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qualifiers = self.qualifier_string();
        if qualifiers.is_empty() {
            f.write_str("default")
        } else {
            f.write_str(&qualifiers)
        }
    }
}

#[cfg(test)]
mod tests;
