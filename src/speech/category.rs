//! Category normalization
//!
//! Maps whatever word the user said ("almuerzo", "uber", "farmacia") onto the
//! fixed set of categories used for statistics and budgets.

use serde::{Deserialize, Serialize};

/// The fixed set of expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalCategory {
    #[serde(rename = "Alimentación")]
    Alimentacion,
    Transporte,
    Entretenimiento,
    Salud,
    Compras,
    Servicios,
    #[serde(rename = "Educación")]
    Educacion,
    Vivienda,
    Hogar,
    Otros,
}

impl CanonicalCategory {
    /// All categories in display order.
    pub const ALL: [CanonicalCategory; 10] = [
        Self::Alimentacion,
        Self::Transporte,
        Self::Entretenimiento,
        Self::Salud,
        Self::Compras,
        Self::Servicios,
        Self::Educacion,
        Self::Vivienda,
        Self::Hogar,
        Self::Otros,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alimentacion => "Alimentación",
            Self::Transporte => "Transporte",
            Self::Entretenimiento => "Entretenimiento",
            Self::Salud => "Salud",
            Self::Compras => "Compras",
            Self::Servicios => "Servicios",
            Self::Educacion => "Educación",
            Self::Vivienda => "Vivienda",
            Self::Hogar => "Hogar",
            Self::Otros => "Otros",
        }
    }

    /// Exact match against the display labels.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == label)
    }
}

impl std::fmt::Display for CanonicalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spoken synonyms, matched by substring in this exact order.
///
/// Order matters: "super" sits before "supermercado", so a supermarket lands
/// in Alimentación.
pub const CATEGORY_SYNONYMS: &[(&str, CanonicalCategory)] = &[
    ("comida", CanonicalCategory::Alimentacion),
    ("almuerzo", CanonicalCategory::Alimentacion),
    ("desayuno", CanonicalCategory::Alimentacion),
    ("cena", CanonicalCategory::Alimentacion),
    ("comidas", CanonicalCategory::Alimentacion),
    ("alimentos", CanonicalCategory::Alimentacion),
    ("restaurante", CanonicalCategory::Alimentacion),
    ("menú", CanonicalCategory::Alimentacion),
    ("menu", CanonicalCategory::Alimentacion),
    ("cafetería", CanonicalCategory::Alimentacion),
    ("café", CanonicalCategory::Alimentacion),
    ("cafe", CanonicalCategory::Alimentacion),
    ("super", CanonicalCategory::Alimentacion),
    ("bodega", CanonicalCategory::Alimentacion),
    ("mercado", CanonicalCategory::Alimentacion),
    ("transporte", CanonicalCategory::Transporte),
    ("taxi", CanonicalCategory::Transporte),
    ("bus", CanonicalCategory::Transporte),
    ("metro", CanonicalCategory::Transporte),
    ("gasolina", CanonicalCategory::Transporte),
    ("combustible", CanonicalCategory::Transporte),
    ("uber", CanonicalCategory::Transporte),
    ("colectivo", CanonicalCategory::Transporte),
    ("micro", CanonicalCategory::Transporte),
    ("combi", CanonicalCategory::Transporte),
    ("moto", CanonicalCategory::Transporte),
    ("estacionamiento", CanonicalCategory::Transporte),
    ("parking", CanonicalCategory::Transporte),
    ("peaje", CanonicalCategory::Transporte),
    ("entretenimiento", CanonicalCategory::Entretenimiento),
    ("cine", CanonicalCategory::Entretenimiento),
    ("juegos", CanonicalCategory::Entretenimiento),
    ("diversión", CanonicalCategory::Entretenimiento),
    ("ocio", CanonicalCategory::Entretenimiento),
    ("netflix", CanonicalCategory::Entretenimiento),
    ("spotify", CanonicalCategory::Entretenimiento),
    ("música", CanonicalCategory::Entretenimiento),
    ("musica", CanonicalCategory::Entretenimiento),
    ("concierto", CanonicalCategory::Entretenimiento),
    ("teatro", CanonicalCategory::Entretenimiento),
    ("bar", CanonicalCategory::Entretenimiento),
    ("salud", CanonicalCategory::Salud),
    ("medicina", CanonicalCategory::Salud),
    ("doctor", CanonicalCategory::Salud),
    ("médico", CanonicalCategory::Salud),
    ("farmacia", CanonicalCategory::Salud),
    ("hospital", CanonicalCategory::Salud),
    ("dentista", CanonicalCategory::Salud),
    ("odontólogo", CanonicalCategory::Salud),
    ("clinica", CanonicalCategory::Salud),
    ("clínica", CanonicalCategory::Salud),
    ("compras", CanonicalCategory::Compras),
    ("ropa", CanonicalCategory::Compras),
    ("zapatos", CanonicalCategory::Compras),
    ("supermercado", CanonicalCategory::Compras),
    ("ferretería", CanonicalCategory::Compras),
    ("ferreteria", CanonicalCategory::Compras),
    ("electrónica", CanonicalCategory::Compras),
    ("electronica", CanonicalCategory::Compras),
    ("tienda", CanonicalCategory::Compras),
    ("servicios", CanonicalCategory::Servicios),
    ("luz", CanonicalCategory::Servicios),
    ("agua", CanonicalCategory::Servicios),
    ("internet", CanonicalCategory::Servicios),
    ("teléfono", CanonicalCategory::Servicios),
    ("celular", CanonicalCategory::Servicios),
    ("telefonía", CanonicalCategory::Servicios),
    ("telefonia", CanonicalCategory::Servicios),
    ("cable", CanonicalCategory::Servicios),
    ("gas", CanonicalCategory::Servicios),
    ("plan", CanonicalCategory::Servicios),
    ("educación", CanonicalCategory::Educacion),
    ("libros", CanonicalCategory::Educacion),
    ("curso", CanonicalCategory::Educacion),
    ("universidad", CanonicalCategory::Educacion),
    ("colegio", CanonicalCategory::Educacion),
    ("escuela", CanonicalCategory::Educacion),
    ("taller", CanonicalCategory::Educacion),
    ("matrícula", CanonicalCategory::Educacion),
    ("matricula", CanonicalCategory::Educacion),
    ("vivienda", CanonicalCategory::Vivienda),
    ("alquiler", CanonicalCategory::Vivienda),
    ("renta", CanonicalCategory::Vivienda),
    ("arriendo", CanonicalCategory::Vivienda),
    ("hogar", CanonicalCategory::Hogar),
    ("limpieza", CanonicalCategory::Hogar),
    ("cocina", CanonicalCategory::Hogar),
    ("otros", CanonicalCategory::Otros),
];

/// Normalize a spoken category to its canonical label.
///
/// The first synonym contained in the lowercased input wins. Without a match
/// the input is passed through with its first character uppercased, so the
/// result is not guaranteed to be canonical.
pub fn normalize_category(text: &str) -> String {
    let normalized = text.to_lowercase();
    let normalized = normalized.trim();

    for (key, category) in CATEGORY_SYNONYMS {
        if normalized.contains(key) {
            return category.as_str().to_string();
        }
    }

    capitalize_first(text)
}

/// Reduce any label to the canonical set, mapping unknown labels to `Otros`.
pub fn canonical_or_other(label: &str) -> CanonicalCategory {
    CanonicalCategory::from_label(label).unwrap_or(CanonicalCategory::Otros)
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms() {
        assert_eq!(normalize_category("almuerzo"), "Alimentación");
        assert_eq!(normalize_category("Uber"), "Transporte");
        assert_eq!(normalize_category("  farmacia "), "Salud");
        assert_eq!(normalize_category("recibo de luz"), "Servicios");
        assert_eq!(normalize_category("alquiler"), "Vivienda");
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(normalize_category("taxista"), "Transporte");
        assert_eq!(normalize_category("cenas"), "Alimentación");
    }

    #[test]
    fn test_table_order_decides_overlaps() {
        assert_eq!(normalize_category("supermercado"), "Alimentación");
        assert_eq!(normalize_category("cafetería"), "Alimentación");
    }

    #[test]
    fn test_canonical_labels_are_stable() {
        for category in CanonicalCategory::ALL {
            assert_eq!(normalize_category(category.as_str()), category.as_str());
        }
        assert_eq!(normalize_category("Alimentación"), "Alimentación");
    }

    #[test]
    fn test_fallback_capitalizes_first_char_only() {
        assert_eq!(normalize_category("pizza"), "Pizza");
        assert_eq!(normalize_category("regalo para MAMÁ"), "Regalo para MAMÁ");
        assert_eq!(normalize_category("ñoquis"), "Ñoquis");
        assert_eq!(normalize_category(""), "");
    }

    #[test]
    fn test_canonical_or_other() {
        assert_eq!(canonical_or_other("Salud"), CanonicalCategory::Salud);
        assert_eq!(canonical_or_other("Pizza"), CanonicalCategory::Otros);
        assert_eq!(canonical_or_other("salud"), CanonicalCategory::Otros);
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&CanonicalCategory::Educacion).unwrap();
        assert_eq!(json, "\"Educación\"");
        let back: CanonicalCategory = serde_json::from_str("\"Alimentación\"").unwrap();
        assert_eq!(back, CanonicalCategory::Alimentacion);
    }
}
