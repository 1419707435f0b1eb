use std::{collections::BTreeMap, fmt, str::FromStr};

use thiserror::Error;

/// One backbone unit of a side chain with up to two branch groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainSegment {
    main: &'static str,
    branches: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    NonpolarAliphatic,
    Aromatic,
    PolarUncharged,
    Acidic,
    Basic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AminoAcid {
    name: &'static str,
    category: Category,
    chain: &'static [ChainSegment],
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl ChainSegment {
    pub fn main(&self) -> &'static str {
        self.main
    }

    pub fn branches(&self) -> &'static [&'static str] {
        self.branches
    }
}

impl Category {
    const ALL: [Category; 5] = [
        Category::NonpolarAliphatic,
        Category::Aromatic,
        Category::PolarUncharged,
        Category::Acidic,
        Category::Basic,
    ];

    pub fn all() -> &'static [Category] {
        &Self::ALL
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::NonpolarAliphatic => "Nonpolar, Aliphatic",
            Category::Aromatic => "Aromatic",
            Category::PolarUncharged => "Polar, Uncharged",
            Category::Acidic => "Acidic (Negative)",
            Category::Basic => "Basic (Positive)",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(wanted.to_owned()))
    }
}

impl AminoAcid {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn chain(&self) -> &'static [ChainSegment] {
        self.chain
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain = self
            .chain
            .iter()
            .map(|segment| {
                if segment.branches.is_empty() {
                    segment.main.to_owned()
                } else {
                    format!("{}({})", segment.main, segment.branches.join(", "))
                }
            })
            .collect::<Vec<_>>()
            .join("-");
        write!(f, "{} [{}]: {}", self.name, self.category, chain)
    }
}

macro_rules! seg {
    ($main:literal) => {
        ChainSegment {
            main: $main,
            branches: &[],
        }
    };
    ($main:literal, [$($branch:literal),+]) => {
        ChainSegment {
            main: $main,
            branches: &[$($branch),+],
        }
    };
}

macro_rules! acid {
    ($name:literal, $category:ident, [$($segment:expr),+ $(,)?]) => {
        AminoAcid {
            name: $name,
            category: Category::$category,
            chain: &[$($segment),+],
        }
    };
}

static CATALOG: [AminoAcid; 18] = [
    acid!("Glycine", NonpolarAliphatic, [seg!("H")]),
    acid!("Alanine", NonpolarAliphatic, [seg!("CH3")]),
    acid!("Valine", NonpolarAliphatic, [seg!("CH", ["CH3", "CH3"])]),
    acid!("Leucine", NonpolarAliphatic, [seg!("CH2"), seg!("CH", ["CH3", "CH3"])]),
    acid!("Isoleucine", NonpolarAliphatic, [seg!("CH", ["CH3"]), seg!("CH2"), seg!("CH3")]),
    acid!("Phenylalanine", Aromatic, [seg!("C6H5")]),
    acid!("Tyrosine", Aromatic, [seg!("C6H4"), seg!("OH")]),
    acid!("Tryptophan", Aromatic, [seg!("C8H6N")]),
    acid!("Serine", PolarUncharged, [seg!("CH2"), seg!("OH")]),
    acid!("Threonine", PolarUncharged, [seg!("CH", ["CH3"]), seg!("OH")]),
    acid!("Cysteine", PolarUncharged, [seg!("CH2"), seg!("SH")]),
    acid!("Asparagine", PolarUncharged, [seg!("CH2"), seg!("CONH2")]),
    acid!("Glutamine", PolarUncharged, [seg!("CH2"), seg!("CH2"), seg!("CONH2")]),
    acid!("Aspartate", Acidic, [seg!("CH2"), seg!("COO-")]),
    acid!("Glutamate", Acidic, [seg!("CH2"), seg!("CH2"), seg!("COO-")]),
    acid!(
        "Lysine",
        Basic,
        [seg!("CH2"), seg!("CH2"), seg!("CH2"), seg!("CH2"), seg!("NH3+")]
    ),
    acid!(
        "Arginine",
        Basic,
        [seg!("CH2"), seg!("CH2"), seg!("CH2"), seg!("C(NH2)2", ["NH"])]
    ),
    acid!("Histidine", Basic, [seg!("CH2"), seg!("C3H3N2")]),
];

pub fn all_amino_acids() -> &'static [AminoAcid] {
    &CATALOG
}

/// Case-insensitive exact lookup.
pub fn find_by_name(name: &str) -> Option<&'static AminoAcid> {
    let name = name.trim();
    CATALOG
        .iter()
        .find(|acid| acid.name.eq_ignore_ascii_case(name))
}

/// Groups keep the order in which `acids` yields them; the map iterates in category order.
pub fn group_by_category<'a>(
    acids: impl IntoIterator<Item = &'a AminoAcid>,
) -> BTreeMap<Category, Vec<&'a AminoAcid>> {
    let mut groups: BTreeMap<Category, Vec<&'a AminoAcid>> = BTreeMap::new();
    for acid in acids {
        groups.entry(acid.category).or_default().push(acid);
    }
    groups
}

pub fn filter_by_name<'a>(
    acids: impl IntoIterator<Item = &'a AminoAcid>,
    query: &str,
) -> Vec<&'a AminoAcid> {
    let query = query.trim().to_lowercase();
    acids
        .into_iter()
        .filter(|acid| query.is_empty() || acid.name.to_lowercase().contains(&query))
        .collect()
}

pub fn filter_by_category<'a>(
    acids: impl IntoIterator<Item = &'a AminoAcid>,
    category: Category,
) -> Vec<&'a AminoAcid> {
    acids
        .into_iter()
        .filter(|acid| acid.category == category)
        .collect()
}
