//! Disease catalog: display names, severity and treatment guidance
//!
//! Static reference data keyed by class label. Downstream consumers get
//! plain structured data; presentation and localization happen elsewhere.

use serde::{Deserialize, Serialize};

/// Intrinsic severity of a disease, independent of weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Medium,
    High,
    Critical,
    Unknown,
}

/// Treatment guidance for a disease.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Treatment {
    pub chemical: &'static str,
    pub application_interval: &'static str,
    pub precautions: &'static str,
    pub organic_alternative: &'static str,
    pub potential_yield_loss: &'static str,
}

/// Full catalog entry for a disease class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseInfo {
    pub class_name: String,
    pub display_name: String,
    pub crop: String,
    pub is_healthy: bool,
    pub severity: Severity,
    pub treatment: Treatment,
}

/// Whether a class label denotes a healthy plant.
pub fn is_healthy(class_name: &str) -> bool {
    class_name.to_lowercase().contains("healthy")
}

/// Intrinsic severity for a class label.
pub fn severity_for(class_name: &str) -> Severity {
    match class_name {
        "pepper_healthy" | "potato_healthy" | "tomato_healthy" => Severity::None,
        "pepper_bacterial_spot"
        | "tomato_bacterial_spot"
        | "tomato_leaf_mold"
        | "tomato_septoria_leaf_spot"
        | "tomato_spider_mites"
        | "tomato_target_spot" => Severity::Medium,
        "potato_early_blight" | "tomato_early_blight" | "tomato_mosaic_virus" => Severity::High,
        "potato_late_blight" | "tomato_late_blight" | "tomato_yellow_leaf_curl_virus" => {
            Severity::Critical
        }
        _ => Severity::Unknown,
    }
}

/// Human-readable display name; unknown labels get a title-cased fallback.
pub fn display_name_for(class_name: &str) -> String {
    match class_name {
        "pepper_bacterial_spot" => "Pepper Bacterial Spot".to_string(),
        "pepper_healthy" => "Pepper (Healthy)".to_string(),
        "potato_early_blight" => "Potato Early Blight".to_string(),
        "potato_healthy" => "Potato (Healthy)".to_string(),
        "potato_late_blight" => "Potato Late Blight".to_string(),
        "tomato_bacterial_spot" => "Tomato Bacterial Spot".to_string(),
        "tomato_early_blight" => "Tomato Early Blight".to_string(),
        "tomato_healthy" => "Tomato (Healthy)".to_string(),
        "tomato_late_blight" => "Tomato Late Blight".to_string(),
        "tomato_leaf_mold" => "Tomato Leaf Mold".to_string(),
        "tomato_mosaic_virus" => "Tomato Mosaic Virus".to_string(),
        "tomato_septoria_leaf_spot" => "Tomato Septoria Leaf Spot".to_string(),
        "tomato_spider_mites" => "Tomato Spider Mites".to_string(),
        "tomato_target_spot" => "Tomato Target Spot".to_string(),
        "tomato_yellow_leaf_curl_virus" => "Tomato Yellow Leaf Curl Virus".to_string(),
        other => title_case(other),
    }
}

fn title_case(class_name: &str) -> String {
    class_name
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Treatment guidance for a class label, with a generic fallback for
/// classes outside the catalog.
pub fn treatment_for(class_name: &str) -> Treatment {
    match class_name {
        "pepper_bacterial_spot" => Treatment {
            chemical: "Copper hydroxide @ 2g/L or Streptomycin sulphate @ 0.5g/L",
            application_interval: "7-10 days",
            precautions: "Remove infected leaves, avoid overhead irrigation, use disease-free seeds",
            organic_alternative: "Neem oil spray @ 5ml/L, copper-based organic fungicides",
            potential_yield_loss: "10-50% if untreated",
        },
        "pepper_healthy" => Treatment {
            chemical: "No treatment needed",
            application_interval: "N/A",
            precautions: "Continue good agricultural practices, maintain proper spacing",
            organic_alternative: "Regular neem oil spray for prevention",
            potential_yield_loss: "None",
        },
        "potato_early_blight" => Treatment {
            chemical: "Mancozeb 75WP @ 2.5g/L or Chlorothalonil @ 2g/L",
            application_interval: "7-10 days",
            precautions: "Crop rotation, remove infected debris, avoid excess nitrogen",
            organic_alternative: "Copper fungicide, compost tea spray",
            potential_yield_loss: "20-50% if untreated",
        },
        "potato_healthy" => Treatment {
            chemical: "No treatment needed",
            application_interval: "N/A",
            precautions: "Maintain proper hilling, balanced fertilization",
            organic_alternative: "Mulching, companion planting",
            potential_yield_loss: "None",
        },
        "potato_late_blight" => Treatment {
            chemical: "Metalaxyl + Mancozeb @ 2.5g/L or Cymoxanil + Mancozeb @ 3g/L",
            application_interval: "5-7 days during outbreak",
            precautions: "URGENT: Destroy infected plants immediately, avoid overhead irrigation",
            organic_alternative: "Bordeaux mixture @ 1%, remove all infected material",
            potential_yield_loss: "Up to 100% - can destroy entire crop",
        },
        "tomato_bacterial_spot" => Treatment {
            chemical: "Copper oxychloride @ 3g/L or Streptocycline @ 0.5g/L",
            application_interval: "7-10 days",
            precautions: "Use certified seeds, avoid working with wet plants",
            organic_alternative: "Copper-based sprays, remove infected plants",
            potential_yield_loss: "10-30% if untreated",
        },
        "tomato_early_blight" => Treatment {
            chemical: "Mancozeb 75WP @ 2.5g/L or Azoxystrobin @ 1ml/L",
            application_interval: "7-10 days",
            precautions: "Stake plants, mulch to prevent soil splash, remove lower leaves",
            organic_alternative: "Neem oil + baking soda spray, compost tea",
            potential_yield_loss: "20-40% if untreated",
        },
        "tomato_healthy" => Treatment {
            chemical: "No treatment needed",
            application_interval: "N/A",
            precautions: "Continue proper staking, pruning, and balanced nutrition",
            organic_alternative: "Regular inspection, companion planting with basil",
            potential_yield_loss: "None",
        },
        "tomato_late_blight" => Treatment {
            chemical: "Metalaxyl-M + Mancozeb @ 2.5g/L or Dimethomorph @ 1g/L",
            application_interval: "5-7 days - URGENT treatment needed",
            precautions: "CRITICAL: Remove and destroy infected plants, do not compost",
            organic_alternative: "Bordeaux mixture @ 1%, immediately remove infected parts",
            potential_yield_loss: "Up to 100% - extremely destructive",
        },
        "tomato_leaf_mold" => Treatment {
            chemical: "Carbendazim @ 1g/L or Chlorothalonil @ 2g/L",
            application_interval: "10-14 days",
            precautions: "Improve ventilation, reduce humidity, space plants properly",
            organic_alternative: "Baking soda spray @ 5g/L, improve air circulation",
            potential_yield_loss: "10-30% if untreated",
        },
        "tomato_mosaic_virus" => Treatment {
            chemical: "No chemical cure - viral disease",
            application_interval: "N/A",
            precautions: "Remove infected plants, disinfect tools, control aphids",
            organic_alternative: "Milk spray (1:9 ratio) may reduce spread, remove infected plants",
            potential_yield_loss: "20-70% depending on infection stage",
        },
        "tomato_septoria_leaf_spot" => Treatment {
            chemical: "Mancozeb @ 2.5g/L or Copper hydroxide @ 2g/L",
            application_interval: "7-10 days",
            precautions: "Remove infected leaves, mulch, avoid overhead watering",
            organic_alternative: "Copper fungicide, neem oil spray",
            potential_yield_loss: "15-30% if untreated",
        },
        "tomato_spider_mites" => Treatment {
            chemical: "Dicofol @ 2ml/L or Abamectin @ 0.5ml/L",
            application_interval: "7 days, 2-3 applications",
            precautions: "Increase humidity, spray water on undersides of leaves",
            organic_alternative: "Neem oil @ 5ml/L, insecticidal soap, predatory mites",
            potential_yield_loss: "10-25% if untreated",
        },
        "tomato_target_spot" => Treatment {
            chemical: "Azoxystrobin @ 1ml/L or Chlorothalonil @ 2g/L",
            application_interval: "7-10 days",
            precautions: "Improve air circulation, stake plants, remove debris",
            organic_alternative: "Copper fungicide, proper plant spacing",
            potential_yield_loss: "15-35% if untreated",
        },
        "tomato_yellow_leaf_curl_virus" => Treatment {
            chemical: "No chemical cure - control whitefly vectors with Imidacloprid @ 0.3ml/L",
            application_interval: "Whitefly control: 10-14 days",
            precautions: "CRITICAL: Remove infected plants, use reflective mulch, insect-proof nets",
            organic_alternative: "Yellow sticky traps, neem oil for whiteflies, remove infected plants",
            potential_yield_loss: "Up to 100% - no cure once infected",
        },
        _ => Treatment {
            chemical: "Consult local agricultural extension office",
            application_interval: "As recommended",
            precautions: "Remove infected plant material",
            organic_alternative: "Neem oil spray as general treatment",
            potential_yield_loss: "Variable",
        },
    }
}

/// Assemble the full catalog entry for a class label.
pub fn disease_info(class_name: &str) -> DiseaseInfo {
    let crop = class_name
        .split('_')
        .next()
        .map(title_case)
        .unwrap_or_default();

    DiseaseInfo {
        class_name: class_name.to_string(),
        display_name: display_name_for(class_name),
        crop,
        is_healthy: is_healthy(class_name),
        severity: severity_for(class_name),
        treatment: treatment_for(class_name),
    }
}
