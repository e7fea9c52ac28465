//! Fixed enumeration of Indian states and union territories, with the
//! two-letter GST code table. Static data, never mutated at runtime.

/// Valid region names in canonical casing.
pub const STATE_NAMES: &[&str] = &[
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Puducherry",
    "Chandigarh",
    "Daman and Diu",
    "Dadra and Nagar Haveli",
    "Lakshadweep",
    "Andaman and Nicobar Islands",
];

/// Two-letter codes to canonical names.
pub const STATE_CODES: &[(&str, &str)] = &[
    ("AP", "Andhra Pradesh"),
    ("AR", "Arunachal Pradesh"),
    ("AS", "Assam"),
    ("BR", "Bihar"),
    ("CT", "Chhattisgarh"),
    ("GA", "Goa"),
    ("GJ", "Gujarat"),
    ("HR", "Haryana"),
    ("HP", "Himachal Pradesh"),
    ("JH", "Jharkhand"),
    ("KA", "Karnataka"),
    ("KL", "Kerala"),
    ("MP", "Madhya Pradesh"),
    ("MH", "Maharashtra"),
    ("MN", "Manipur"),
    ("ML", "Meghalaya"),
    ("MZ", "Mizoram"),
    ("NL", "Nagaland"),
    ("OR", "Odisha"),
    ("PB", "Punjab"),
    ("RJ", "Rajasthan"),
    ("SK", "Sikkim"),
    ("TN", "Tamil Nadu"),
    ("TG", "Telangana"),
    ("TR", "Tripura"),
    ("UP", "Uttar Pradesh"),
    ("UK", "Uttarakhand"),
    ("WB", "West Bengal"),
    ("DL", "Delhi"),
    ("JK", "Jammu and Kashmir"),
    ("LA", "Ladakh"),
    ("PY", "Puducherry"),
    ("CH", "Chandigarh"),
    ("DD", "Daman and Diu"),
    ("DN", "Dadra and Nagar Haveli"),
    ("LD", "Lakshadweep"),
    ("AN", "Andaman and Nicobar Islands"),
];

/// Canonicalize a region name or code. First rule that matches wins:
/// (1) two-letter code, (2) case-insensitive exact name,
/// (3) substring match in either direction as a last resort.
pub fn canonical_state(input: &str) -> Option<&'static str> {
    let cleaned = input.trim().to_uppercase();
    if cleaned.is_empty() {
        return None;
    }

    if let Some((_, name)) = STATE_CODES.iter().find(|(code, _)| *code == cleaned) {
        return Some(*name);
    }

    if let Some(name) = STATE_NAMES.iter().find(|name| name.to_uppercase() == cleaned) {
        return Some(*name);
    }

    STATE_NAMES
        .iter()
        .find(|name| {
            let upper = name.to_uppercase();
            upper.contains(&cleaned) || cleaned.contains(&upper)
        })
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_maps_to_canonical_name() {
        assert_eq!(canonical_state("MH"), Some("Maharashtra"));
        assert_eq!(canonical_state("dl"), Some("Delhi"));
    }

    #[test]
    fn exact_name_matches_case_insensitively() {
        assert_eq!(canonical_state("tamil nadu"), Some("Tamil Nadu"));
        assert_eq!(canonical_state("  MAHARASHTRA "), Some("Maharashtra"));
    }

    #[test]
    fn substring_match_is_a_last_resort() {
        assert_eq!(canonical_state("State of Goa"), Some("Goa"));
        assert_eq!(canonical_state("Maha"), Some("Maharashtra"));
    }

    #[test]
    fn unrecognized_region_does_not_match() {
        assert_eq!(canonical_state("Mumbai City"), None);
        assert_eq!(canonical_state(""), None);
        assert_eq!(canonical_state("XX"), None);
    }

    #[test]
    fn tables_agree_on_every_code() {
        for (_, name) in STATE_CODES {
            assert!(STATE_NAMES.contains(name), "{name} missing from names");
        }
        assert_eq!(STATE_CODES.len(), STATE_NAMES.len());
    }
}
