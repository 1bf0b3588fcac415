use serde::{Deserialize, Serialize};

/// The six fitness tests of the annual battery.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    Gainage,
    Killy,
    LucLeger,
    Pompes,
    Souplesse,
    Tractions,
}

impl TestKind {
    pub const COUNT: usize = 6;

    /// Battery order, which is also the display order.
    pub const ALL: [TestKind; TestKind::COUNT] = [
        TestKind::Gainage,
        TestKind::Killy,
        TestKind::LucLeger,
        TestKind::Pompes,
        TestKind::Souplesse,
        TestKind::Tractions,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            TestKind::Gainage => "Gainage",
            TestKind::Killy => "Killy",
            TestKind::LucLeger => "Luc Léger",
            TestKind::Pompes => "Pompes",
            TestKind::Souplesse => "Souplesse",
            TestKind::Tractions => "Tractions",
        }
    }

    /// Result column, after header normalisation.
    pub fn result_column(self) -> &'static str {
        match self {
            TestKind::Gainage => "resul gain",
            TestKind::Killy => "resul killy",
            TestKind::LucLeger => "resul ll",
            TestKind::Pompes => "resul pompes",
            TestKind::Souplesse => "resul souplesse",
            TestKind::Tractions => "resul tractions",
        }
    }

    /// Companion tier column. Naming is not uniform in the source sheets.
    pub fn tier_column(self) -> &'static str {
        match self {
            TestKind::Gainage => "niveau gain",
            TestKind::Killy => "niv killy",
            TestKind::LucLeger => "niv ll",
            TestKind::Pompes => "niv pompes",
            TestKind::Souplesse => "niv souplesse",
            TestKind::Tractions => "niv tractions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_battery_order() {
        for (i, kind) in TestKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn columns_are_distinct() {
        let mut columns: Vec<&str> = TestKind::ALL
            .iter()
            .flat_map(|k| [k.result_column(), k.tier_column()])
            .collect();
        columns.sort_unstable();
        columns.dedup();
        assert_eq!(columns.len(), TestKind::COUNT * 2);
    }
}
