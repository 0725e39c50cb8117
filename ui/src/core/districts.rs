//! Canonical district names and the spellings field teams use for them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct District {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

pub const DISTRICTS: &[District] = &[
    District { name: "Adoni", aliases: &[] },
    District { name: "Alluri Seetaramaraju", aliases: &["ASRR"] },
    District { name: "Anakapalli", aliases: &[] },
    District { name: "Anantapuramu", aliases: &[] },
    District { name: "Annamayya", aliases: &["Annamaya"] },
    District { name: "Bapatla", aliases: &[] },
    District { name: "Chittoor", aliases: &["Chitoor"] },
    District { name: "Dr. B.R.A. Konaseema", aliases: &["Dr. B.R. Konaseema", "Konaseema"] },
    District { name: "East Godavari", aliases: &["EG"] },
    District { name: "Eluru", aliases: &[] },
    District { name: "Guntur", aliases: &[] },
    District { name: "Kakinada", aliases: &[] },
    District { name: "Krishna", aliases: &[] },
    District { name: "Kurnool", aliases: &[] },
    District { name: "Nandyal", aliases: &[] },
    District { name: "Nellore", aliases: &[] },
    District { name: "NTR", aliases: &[] },
    District { name: "Palnadu", aliases: &[] },
    District { name: "Parvathipuram", aliases: &["Parvatipuram"] },
    District { name: "Prakasam", aliases: &[] },
    District { name: "Srikakulam", aliases: &[] },
    District { name: "Sri Sathya Sai", aliases: &["SSS"] },
    District { name: "Tirupati", aliases: &[] },
    District { name: "Vizianagaram", aliases: &["Vijayanagaram"] },
    District { name: "Visakhapatnam", aliases: &["VSKP", "Vizag"] },
    District { name: "West Godavari", aliases: &["WG"] },
    District { name: "YSR Kadapa", aliases: &["YSR", "Kadapa"] },
];

/// Looks a district up by canonical name or alias, ignoring case and surrounding spaces.
pub fn lookup(raw: &str) -> Option<&'static District> {
    let wanted = raw.trim();
    if wanted.is_empty() {
        return None;
    }
    DISTRICTS.iter().find(|district| {
        district.name.eq_ignore_ascii_case(wanted)
            || district
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(wanted))
    })
}

/// Canonical spelling when the district is known, otherwise the trimmed input.
pub fn canonical_name(raw: &str) -> String {
    lookup(raw)
        .map(|district| district.name.to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

/// Backend table holding a district's DCB rows, e.g. `dcb_east_godavari`.
pub fn table_name(district: &str) -> String {
    format!("dcb_{}", slug(district))
}

/// Lower-case, underscore separated identifier with no leading, trailing or repeated `_`.
pub fn slug(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        match ch {
            '\'' => {}
            ch if ch.is_alphanumeric() => out.extend(ch.to_lowercase()),
            _ => {
                if !out.is_empty() && !out.ends_with('_') {
                    out.push('_');
                }
            }
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}
