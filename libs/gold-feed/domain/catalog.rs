//! Canonical instrument catalog.
//!
//! The upstream renames instruments freely ("Çeyrek Altın", "Yeni
//! Çeyrek Altın", ...), so every known label variant maps to one stable
//! internal id. Names that are not in the table are dropped by callers
//! rather than given a fabricated id.

/// Maps an upstream instrument label to its canonical id.
///
/// Matching is exact after trimming. Returns `None` for unknown labels.
pub fn canonical_id(upstream_name: &str) -> Option<&'static str> {
    let id = match upstream_name.trim() {
        "ONS" | "ONS Altın" | "Ons Altın" => "ons",
        "Gram Altın" | "Has Altın" | "24 Ayar Altın" => "gram",
        "Külçe Altın" => "kulce",
        "Çeyrek Altın" | "Yeni Çeyrek Altın" => "ceyrek",
        "Eski Çeyrek Altın" => "eski_ceyrek",
        "Yarım Altın" | "Yeni Yarım Altın" => "yarim",
        "Eski Yarım Altın" => "eski_yarim",
        "Tam Altın" | "Yeni Tam Altın" => "tam",
        "Eski Tam Altın" => "eski_tam",
        "Cumhuriyet Altını" => "cumhuriyet",
        "Ata Altın" => "ata",
        "Reşat Altın" => "resat",
        "Hamit Altın" => "hamit",
        "14 Ayar Altın" => "14ayar",
        "18 Ayar Altın" => "18ayar",
        "22 Ayar Altın" => "22ayar",
        "22 Ayar Bilezik" | "Bilezik" => "bilezik_22",
        "14 Ayar Bilezik" => "bilezik_14",
        "Ziynet Altın" | "İşçilikli Ziynet" => "ziynet",
        "Gremse Altın" => "gremse",
        "Beşli Gremse" | "Gremse Beşli" => "gremse_besli",
        "Ata Beşli" => "ata_besli",
        "Teklik" => "teklik",
        "Ikili Altın" => "ikili",
        "Gümüş" => "gumus",
        "Gümüş ONS" => "gumus_ons",
        "Platin" => "platin",
        "Platin ONS" => "platin_ons",
        "Paladyum" => "paladyum",
        "Paladyum ONS" => "paladyum_ons",
        "Rodyum" => "rodyum",
        "Bakır" => "bakir",
        "Bronz" => "bronz",
        _ => return None,
    };
    Some(id)
}

/// Turkish display name for a canonical id; `None` for unknown ids so
/// callers can fall back to the raw upstream label.
pub fn display_name(id: &str) -> Option<&'static str> {
    let name = match id {
        "ons" => "ONS Altın",
        "gram" => "Gram Altın",
        "kulce" => "Külçe Altın",
        "ceyrek" => "Çeyrek Altın",
        "eski_ceyrek" => "Eski Çeyrek",
        "yarim" => "Yarım Altın",
        "eski_yarim" => "Eski Yarım",
        "tam" => "Tam Altın",
        "eski_tam" => "Eski Tam",
        "cumhuriyet" => "Cumhuriyet Altını",
        "ata" => "Ata Altın",
        "resat" => "Reşat Altın",
        "hamit" => "Hamit Altın",
        "14ayar" => "14 Ayar Altın",
        "18ayar" => "18 Ayar Altın",
        "22ayar" => "22 Ayar Altın",
        "bilezik_22" => "22 Ayar Bilezik",
        "bilezik_14" => "14 Ayar Bilezik",
        "ziynet" => "Ziynet Altın",
        "gremse" => "Gremse Altın",
        "gremse_besli" => "Gremse Beşli",
        "ata_besli" => "Ata Beşli",
        "teklik" => "Teklik Altın",
        "ikili" => "İkili Altın",
        "gumus" => "Gümüş",
        "gumus_ons" => "Gümüş ONS",
        "platin" => "Platin",
        "platin_ons" => "Platin ONS",
        "paladyum" => "Paladyum",
        "paladyum_ons" => "Paladyum ONS",
        "rodyum" => "Rodyum",
        "bakir" => "Bakır",
        "bronz" => "Bronz",
        _ => return None,
    };
    Some(name)
}

/// Presentation icon for a canonical id, defaulted for unknown ids.
pub fn icon(id: &str) -> &'static str {
    match id {
        "ons" => "📊",
        "gram" => "🪙",
        "kulce" => "🧱",
        "ceyrek" | "eski_ceyrek" => "🥇",
        "yarim" | "eski_yarim" => "🥈",
        "tam" | "eski_tam" => "🏅",
        "cumhuriyet" => "🏛️",
        "ata" => "👤",
        "resat" | "hamit" => "👑",
        "14ayar" | "18ayar" | "22ayar" => "💍",
        "bilezik_22" | "bilezik_14" => "📿",
        "ziynet" => "✨",
        "gremse" => "🥞",
        "gremse_besli" => "📦",
        "ata_besli" => "🎖️",
        "teklik" => "🔘",
        "ikili" => "🔗",
        "gumus" | "gumus_ons" => "🥈",
        "platin" | "platin_ons" => "⚙️",
        "paladyum" | "paladyum_ons" => "🏭",
        "rodyum" => "🧪",
        "bakir" => "🥉",
        "bronz" => "🛡️",
        _ => "🪙",
    }
}
