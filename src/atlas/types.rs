//! Core ID types for the scanner atlas.

/// Unique identifier for a scanner.
///
/// Taken from the scanner report header, so ids need not be contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScannerId(pub u32);

impl ScannerId {
    /// Create a new ScannerId with the given value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ScannerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_id_ordering() {
        let mut ids = vec![ScannerId::new(4), ScannerId::new(0), ScannerId::new(2)];
        ids.sort();

        assert_eq!(ids, vec![ScannerId(0), ScannerId(2), ScannerId(4)]);
    }

    #[test]
    fn test_scanner_id_display() {
        assert_eq!(format!("{}", ScannerId::new(17)), "S17");
    }

    #[test]
    fn test_id_as_hashmap_key() {
        use std::collections::HashMap;

        let mut map: HashMap<ScannerId, &str> = HashMap::new();
        map.insert(ScannerId::new(1), "first");
        map.insert(ScannerId::new(2), "second");

        assert_eq!(map.get(&ScannerId::new(1)), Some(&"first"));
        assert_eq!(map.get(&ScannerId::new(3)), None);
    }
}
