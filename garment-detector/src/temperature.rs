use crate::types::Temperature;

/// Garments worn in cold weather. Checked before the hot list.
pub const COLD_KEYWORDS: &[&str] = &[
    "manteau", "doudoune", "parka", "pull", "sweat", "écharpe", "gants", "bonnet", "bottes",
    "coat", "puffer", "sweater", "hoodie", "scarf", "gloves", "beanie", "boots",
];

pub const HOT_KEYWORDS: &[&str] = &[
    "t-shirt", "débardeur", "short", "sandales", "maillot", "tank top", "sandals", "swimsuit",
];

pub fn classify_temperature(category: &str) -> Temperature {
    let lowered = category.to_lowercase();
    if COLD_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        Temperature::Cold
    } else if HOT_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        Temperature::Hot
    } else {
        Temperature::Mild
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_cases() {
        assert_eq!(classify_temperature("doudoune"), Temperature::Cold);
        assert_eq!(classify_temperature("Doudoune"), Temperature::Cold);
        assert_eq!(classify_temperature("short"), Temperature::Hot);
        assert_eq!(classify_temperature("t-shirt"), Temperature::Hot);
        assert_eq!(classify_temperature("sac"), Temperature::Mild);
    }

    #[test]
    fn canonical_labels() {
        assert_eq!(classify_temperature("Sweat à capuche"), Temperature::Cold);
        assert_eq!(classify_temperature("Pull"), Temperature::Cold);
        assert_eq!(classify_temperature("Pantalon"), Temperature::Mild);
        assert_eq!(classify_temperature("Jean"), Temperature::Mild);
        assert_eq!(classify_temperature("Débardeur"), Temperature::Hot);
        assert_eq!(classify_temperature(""), Temperature::Mild);
    }
}
