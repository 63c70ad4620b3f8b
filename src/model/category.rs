/// Top-level plugin grouping in the plugin database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Effects,
    Generators,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Effects, Category::Generators];

    /// Folder name under the scan root, also used as the per-category file stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Effects => "Effects",
            Category::Generators => "Generators",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "effects" | "effect" => Ok(Category::Effects),
            "generators" | "generator" => Ok(Category::Generators),
            _ => Err(format!(
                "Unknown category: {}. Use 'effects' or 'generators'",
                s
            )),
        }
    }
}

/// Packaging convention subfolder inside a category folder.
///
/// The database also has a `New` folder, which only repeats entries from the
/// others and is never scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatFolder {
    Fruity,
    Vst,
    Vst3,
}

impl FormatFolder {
    pub const ALL: [FormatFolder; 3] = [FormatFolder::Fruity, FormatFolder::Vst, FormatFolder::Vst3];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatFolder::Fruity => "Fruity",
            FormatFolder::Vst => "VST",
            FormatFolder::Vst3 => "VST3",
        }
    }

    /// Native plugins are not listed in the verified index and skip verification.
    pub fn is_native(&self) -> bool {
        matches!(self, FormatFolder::Fruity)
    }
}

impl std::fmt::Display for FormatFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!("Effects".parse::<Category>(), Ok(Category::Effects));
        assert_eq!("generator".parse::<Category>(), Ok(Category::Generators));
        assert!("patterns".parse::<Category>().is_err());
    }

    #[test]
    fn test_only_fruity_is_native() {
        let native: Vec<_> = FormatFolder::ALL.iter().filter(|f| f.is_native()).collect();
        assert_eq!(native, vec![&FormatFolder::Fruity]);
    }
}
