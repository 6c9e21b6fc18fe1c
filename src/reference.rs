use std::collections::HashMap;

pub const UNKNOWN_CLASS: &str = "Unknown";
const CHAMPION_PAGE_BASE: &str = "https://www.leagueoflegends.com/en-us/champions";

// Champion name -> archetype classes, in display order
const CHAMPION_CLASSES: &[(&str, &[&str])] = &[
    ("Aatrox", &["Fighter", "Tank"]),
    ("Ahri", &["Mage", "Assassin"]),
    ("Akali", &["Assassin"]),
    ("Akshan", &["Marksman", "Assassin"]),
    ("Alistar", &["Tank", "Support"]),
    ("Ambessa", &["Fighter", "Assassin"]),
    ("Amumu", &["Tank", "Mage"]),
    ("Anivia", &["Mage", "Support"]),
    ("Annie", &["Mage"]),
    ("Aphelios", &["Marksman"]),
    ("Ashe", &["Marksman", "Support"]),
    ("Aurelion Sol", &["Mage"]),
    ("Aurora", &["Mage", "Assassin"]),
    ("Azir", &["Mage", "Marksman"]),
    ("Bard", &["Support", "Mage"]),
    ("Bel'Veth", &["Fighter"]),
    ("Blitzcrank", &["Tank", "Fighter"]),
    ("Brand", &["Mage"]),
    ("Braum", &["Support", "Tank"]),
    ("Briar", &["Fighter", "Assassin"]),
    ("Caitlyn", &["Marksman"]),
    ("Camille", &["Fighter"]),
    ("Cassiopeia", &["Mage"]),
    ("Cho'Gath", &["Tank", "Mage"]),
    ("Corki", &["Marksman"]),
    ("Darius", &["Fighter", "Tank"]),
    ("Diana", &["Fighter", "Mage"]),
    ("Dr. Mundo", &["Fighter", "Tank"]),
    ("Draven", &["Marksman"]),
    ("Ekko", &["Assassin", "Fighter"]),
    ("Elise", &["Mage", "Fighter"]),
    ("Evelynn", &["Assassin", "Mage"]),
    ("Ezreal", &["Marksman", "Mage"]),
    ("Fiddlesticks", &["Mage", "Support"]),
    ("Fiora", &["Fighter", "Assassin"]),
    ("Fizz", &["Assassin", "Fighter"]),
    ("Galio", &["Tank", "Mage"]),
    ("Gangplank", &["Fighter"]),
    ("Garen", &["Fighter", "Tank"]),
    ("Gnar", &["Fighter", "Tank"]),
    ("Gragas", &["Fighter", "Mage"]),
    ("Graves", &["Marksman"]),
    ("Gwen", &["Fighter", "Assassin"]),
    ("Hecarim", &["Fighter", "Tank"]),
    ("Heimerdinger", &["Mage", "Support"]),
    ("Hwei", &["Mage", "Support"]),
    ("Illaoi", &["Fighter", "Tank"]),
    ("Irelia", &["Fighter", "Assassin"]),
    ("Ivern", &["Support", "Mage"]),
    ("Janna", &["Support", "Mage"]),
    ("Jarvan IV", &["Tank", "Fighter"]),
    ("Jax", &["Fighter", "Assassin"]),
    ("Jayce", &["Fighter", "Marksman"]),
    ("Jhin", &["Marksman", "Mage"]),
    ("Jinx", &["Marksman"]),
    ("K'Sante", &["Tank", "Fighter"]),
    ("Kai'Sa", &["Marksman"]),
    ("Kalista", &["Marksman"]),
    ("Karma", &["Mage", "Support"]),
    ("Karthus", &["Mage"]),
    ("Kassadin", &["Assassin", "Mage"]),
    ("Katarina", &["Assassin", "Mage"]),
    ("Kayle", &["Fighter", "Support"]),
    ("Kayn", &["Fighter", "Assassin"]),
    ("Kennen", &["Mage"]),
    ("Kha'Zix", &["Assassin"]),
    ("Kindred", &["Marksman"]),
    ("Kled", &["Fighter", "Tank"]),
    ("Kog'Maw", &["Marksman", "Mage"]),
    ("LeBlanc", &["Assassin", "Mage"]),
    ("Lee Sin", &["Fighter", "Assassin"]),
    ("Leona", &["Tank", "Support"]),
    ("Lillia", &["Fighter", "Mage"]),
    ("Lissandra", &["Mage"]),
    ("Lucian", &["Marksman"]),
    ("Lulu", &["Support", "Mage"]),
    ("Lux", &["Mage", "Support"]),
    ("Malphite", &["Tank", "Fighter"]),
    ("Malzahar", &["Mage", "Assassin"]),
    ("Maokai", &["Tank", "Mage"]),
    ("Master Yi", &["Assassin", "Fighter"]),
    ("Mel", &["Mage", "Support"]),
    ("Milio", &["Support"]),
    ("Miss Fortune", &["Marksman"]),
    ("Mordekaiser", &["Fighter"]),
    ("Morgana", &["Mage", "Support"]),
    ("Naafiri", &["Assassin", "Fighter"]),
    ("Nami", &["Support", "Mage"]),
    ("Nasus", &["Fighter", "Tank"]),
    ("Nautilus", &["Tank", "Support"]),
    ("Neeko", &["Mage", "Support"]),
    ("Nidalee", &["Assassin", "Mage"]),
    ("Nilah", &["Fighter", "Assassin"]),
    ("Nocturne", &["Assassin", "Fighter"]),
    ("Nunu & Willump", &["Tank", "Mage"]),
    ("Olaf", &["Fighter", "Tank"]),
    ("Orianna", &["Mage", "Support"]),
    ("Ornn", &["Tank", "Fighter"]),
    ("Pantheon", &["Fighter", "Assassin"]),
    ("Poppy", &["Tank", "Fighter"]),
    ("Pyke", &["Support", "Assassin"]),
    ("Qiyana", &["Assassin", "Fighter"]),
    ("Quinn", &["Marksman", "Assassin"]),
    ("Rakan", &["Support"]),
    ("Rammus", &["Tank", "Fighter"]),
    ("Rek'Sai", &["Fighter"]),
    ("Rell", &["Tank", "Support"]),
    ("Renata Glasc", &["Support", "Mage"]),
    ("Renekton", &["Fighter", "Tank"]),
    ("Rengar", &["Assassin", "Fighter"]),
    ("Riven", &["Fighter", "Assassin"]),
    ("Rumble", &["Fighter", "Mage"]),
    ("Ryze", &["Mage", "Fighter"]),
    ("Samira", &["Marksman"]),
    ("Sejuani", &["Tank", "Fighter"]),
    ("Senna", &["Marksman", "Support"]),
    ("Seraphine", &["Mage", "Support"]),
    ("Sett", &["Fighter", "Tank"]),
    ("Shaco", &["Assassin"]),
    ("Shen", &["Tank"]),
    ("Shyvana", &["Fighter", "Tank"]),
    ("Singed", &["Tank", "Mage"]),
    ("Sion", &["Tank", "Fighter"]),
    ("Sivir", &["Marksman"]),
    ("Skarner", &["Tank", "Fighter"]),
    ("Smolder", &["Marksman", "Mage"]),
    ("Sona", &["Support", "Mage"]),
    ("Soraka", &["Support", "Mage"]),
    ("Swain", &["Mage", "Fighter"]),
    ("Sylas", &["Mage", "Assassin"]),
    ("Syndra", &["Mage"]),
    ("Tahm Kench", &["Support", "Tank"]),
    ("Taliyah", &["Mage", "Support"]),
    ("Talon", &["Assassin"]),
    ("Taric", &["Support", "Fighter"]),
    ("Teemo", &["Marksman", "Assassin"]),
    ("Thresh", &["Support", "Fighter"]),
    ("Tristana", &["Marksman", "Assassin"]),
    ("Trundle", &["Fighter", "Tank"]),
    ("Tryndamere", &["Fighter", "Assassin"]),
    ("Twisted Fate", &["Mage"]),
    ("Twitch", &["Marksman", "Assassin"]),
    ("Udyr", &["Fighter", "Tank"]),
    ("Urgot", &["Fighter", "Tank"]),
    ("Varus", &["Marksman", "Mage"]),
    ("Vayne", &["Marksman", "Assassin"]),
    ("Veigar", &["Mage"]),
    ("Vel'Koz", &["Mage"]),
    ("Vex", &["Mage"]),
    ("Vi", &["Fighter", "Assassin"]),
    ("Viego", &["Assassin", "Fighter"]),
    ("Viktor", &["Mage"]),
    ("Vladimir", &["Mage", "Fighter"]),
    ("Volibear", &["Fighter", "Tank"]),
    ("Warwick", &["Fighter", "Tank"]),
    ("Wukong", &["Fighter", "Tank"]),
    ("Xayah", &["Marksman"]),
    ("Xerath", &["Mage", "Assassin"]),
    ("Xin Zhao", &["Fighter", "Assassin"]),
    ("Yasuo", &["Fighter", "Assassin"]),
    ("Yone", &["Assassin", "Fighter"]),
    ("Yorick", &["Fighter", "Tank"]),
    ("Yuumi", &["Support", "Mage"]),
    ("Zac", &["Tank", "Fighter"]),
    ("Zed", &["Assassin"]),
    ("Zeri", &["Marksman"]),
    ("Ziggs", &["Mage"]),
    ("Zilean", &["Support", "Mage"]),
    ("Zoe", &["Mage", "Support"]),
    ("Zyra", &["Mage", "Support"]),
];

// Official page slugs that are not derivable from the display name
const SLUG_OVERRIDES: &[(&str, &str)] = &[
    ("Nunu & Willump", "nunu"),
    ("Renata Glasc", "renata"),
];

/// Static champion reference data, in a fixed order.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl ReferenceData {
    pub fn builtin() -> Self {
        Self::from_entries(CHAMPION_CLASSES.iter().map(|(name, classes)| {
            (
                name.to_string(),
                classes.iter().map(|c| c.to_string()).collect(),
            )
        }))
    }

    /// Duplicate names keep their first position and their last classes.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        let mut data = ReferenceData {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        for (name, classes) in entries {
            match data.index.get(&name) {
                Some(&pos) => data.entries[pos].1 = classes,
                None => {
                    data.index.insert(name.clone(), data.entries.len());
                    data.entries.push((name, classes));
                }
            }
        }
        data
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, champion: &str) -> bool {
        self.index.contains_key(champion)
    }

    /// Archetype classes, or `["Unknown"]` for a champion the table lacks.
    pub fn classes_for(&self, champion: &str) -> Vec<String> {
        match self.index.get(champion) {
            Some(&pos) if !self.entries[pos].1.is_empty() => self.entries[pos].1.clone(),
            _ => vec![UNKNOWN_CLASS.to_string()],
        }
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn champion_slug(champion: &str) -> String {
    if let Some((_, slug)) = SLUG_OVERRIDES.iter().find(|(name, _)| *name == champion) {
        return slug.to_string();
    }
    champion
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Official champion page.
pub fn champion_url(champion: &str) -> String {
    format!("{}/{}/", CHAMPION_PAGE_BASE, champion_slug(champion))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_unique_names() {
        let data = ReferenceData::builtin();
        assert_eq!(data.len(), CHAMPION_CLASSES.len());
        assert_eq!(data.names().next(), Some("Aatrox"));
    }

    #[test]
    fn unknown_champion_gets_unknown_class() {
        let data = ReferenceData::builtin();
        assert_eq!(data.classes_for("Ahri"), vec!["Mage", "Assassin"]);
        assert_eq!(data.classes_for("Mystery"), vec![UNKNOWN_CLASS]);
        assert_eq!(data.classes_for("ahri"), vec![UNKNOWN_CLASS]);
    }

    #[test]
    fn duplicate_reference_entry_keeps_first_position() {
        let data = ReferenceData::from_entries(vec![
            ("Ahri".to_string(), vec!["Mage".to_string()]),
            ("Zed".to_string(), vec!["Assassin".to_string()]),
            ("Ahri".to_string(), vec!["Assassin".to_string()]),
        ]);
        assert_eq!(data.names().collect::<Vec<_>>(), vec!["Ahri", "Zed"]);
        assert_eq!(data.classes_for("Ahri"), vec!["Assassin"]);
    }

    #[test]
    fn champion_urls() {
        assert_eq!(
            champion_url("Kai'Sa"),
            "https://www.leagueoflegends.com/en-us/champions/kaisa/"
        );
        assert_eq!(champion_slug("Dr. Mundo"), "drmundo");
        assert_eq!(champion_slug("Nunu & Willump"), "nunu");
    }
}
