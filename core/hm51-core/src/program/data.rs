//! Static exercise tables for the four weekly day templates.
//!
//! Baselines here are week-1 weights; the catalog applies progression and
//! deload on top. Rest prescriptions are stored in whole seconds.

use super::progression::Progression;

#[derive(Debug, Clone, Copy)]
pub(crate) struct ExerciseTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub sets: u32,
    pub reps: &'static str,
    /// Week-1 working weight, kg. Zero for bodyweight work.
    pub weight: f64,
    pub rest_secs: u32,
    pub notes: &'static str,
    pub progression: Option<Progression>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DayTemplate {
    pub day: &'static str,
    pub name: &'static str,
    pub focus: &'static str,
    pub warmup: &'static str,
    pub exercises: &'static [ExerciseTemplate],
}

const fn rule(frequency: u32, increment: f64) -> Option<Progression> {
    Some(Progression {
        frequency,
        increment,
    })
}

/// The odd-week half of the biceps rotation slot; [`CURL_SPIDER`] takes the
/// same slot on even weeks.
pub(crate) const CURL_INCLINE: ExerciseTemplate = ExerciseTemplate {
    id: "curl-incline-halteres",
    name: "Curl Incliné Haltères",
    sets: 4,
    reps: "8-10",
    weight: 14.0,
    rest_secs: 90,
    notes: "Rotation complète, étirement maximal",
    progression: rule(3, 1.0),
};

pub(crate) const CURL_SPIDER: ExerciseTemplate = ExerciseTemplate {
    id: "curl-spider",
    name: "Curl Spider",
    sets: 4,
    reps: "8-10",
    weight: 14.0,
    rest_secs: 90,
    notes: "Rotation complète, étirement maximal",
    progression: rule(3, 1.0),
};

/// The biceps slot alternates by week parity: incline odd, spider even.
pub(crate) fn biceps_curl_for_week(week: u32) -> &'static ExerciseTemplate {
    if week % 2 == 1 {
        &CURL_INCLINE
    } else {
        &CURL_SPIDER
    }
}

const DIMANCHE: DayTemplate = DayTemplate {
    day: "dimanche",
    name: "Dimanche",
    focus: "Pectoraux / Épaules / Triceps",
    warmup: "5-10min cardio léger + mobilité épaules",
    exercises: &[
        ExerciseTemplate {
            id: "developpe-couche-barre",
            name: "Développé Couché Barre",
            sets: 5,
            reps: "5",
            weight: 80.0,
            rest_secs: 180,
            notes: "Technique stricte, contrôler la descente",
            progression: rule(2, 2.5),
        },
        ExerciseTemplate {
            id: "developpe-incline-halteres",
            name: "Développé Incliné Haltères",
            sets: 4,
            reps: "8-10",
            weight: 30.0,
            rest_secs: 120,
            notes: "Inclinaison 30-45°",
            progression: rule(2, 2.5),
        },
        ExerciseTemplate {
            id: "dips-lestes",
            name: "Dips Lestés",
            sets: 3,
            reps: "10-12",
            weight: 10.0,
            rest_secs: 90,
            notes: "Légèrement penché en avant",
            progression: rule(3, 2.5),
        },
        ExerciseTemplate {
            id: "developpe-militaire-barre",
            name: "Développé Militaire Barre",
            sets: 4,
            reps: "6-8",
            weight: 50.0,
            rest_secs: 120,
            notes: "Debout, gainage maximal",
            progression: rule(2, 2.5),
        },
        ExerciseTemplate {
            id: "elevations-laterales",
            name: "Élévations Latérales",
            sets: 3,
            reps: "12-15",
            weight: 12.0,
            rest_secs: 60,
            notes: "Contrôler la montée et descente",
            progression: rule(3, 1.0),
        },
        ExerciseTemplate {
            id: "barre-au-front",
            name: "Barre au Front",
            sets: 3,
            reps: "10-12",
            weight: 25.0,
            rest_secs: 90,
            notes: "Coudes fixes, extension complète",
            progression: rule(3, 2.5),
        },
        ExerciseTemplate {
            id: "extension-triceps-poulie",
            name: "Extension Triceps Poulie Haute",
            sets: 3,
            reps: "12-15",
            weight: 20.0,
            rest_secs: 60,
            notes: "Superset possible avec élévations",
            progression: rule(4, 2.5),
        },
    ],
};

const MARDI: DayTemplate = DayTemplate {
    day: "mardi",
    name: "Mardi",
    focus: "Dos / Biceps / Avant-bras",
    warmup: "5-10min rameur + mobilité thoracique",
    exercises: &[
        ExerciseTemplate {
            id: "trap-bar-deadlift",
            name: "Trap Bar Deadlift",
            sets: 5,
            reps: "5",
            weight: 120.0,
            rest_secs: 180,
            notes: "Mouvement roi, explosif en montée",
            progression: rule(2, 5.0),
        },
        ExerciseTemplate {
            id: "tractions-lestees",
            name: "Tractions Lestées",
            sets: 4,
            reps: "6-8",
            weight: 10.0,
            rest_secs: 150,
            notes: "Prise large, amplitude complète",
            progression: rule(2, 2.5),
        },
        ExerciseTemplate {
            id: "rowing-barre",
            name: "Rowing Barre Buste Penché",
            sets: 4,
            reps: "8-10",
            weight: 60.0,
            rest_secs: 120,
            notes: "Tirage vers nombril, serrer omoplates",
            progression: rule(2, 2.5),
        },
        ExerciseTemplate {
            id: "tirage-horizontal",
            name: "Tirage Horizontal",
            sets: 3,
            reps: "10-12",
            weight: 50.0,
            rest_secs: 90,
            notes: "Squeeze de 1s en contraction",
            progression: rule(3, 2.5),
        },
        CURL_INCLINE,
        ExerciseTemplate {
            id: "curl-barre-ez",
            name: "Curl Barre EZ",
            sets: 3,
            reps: "10-12",
            weight: 30.0,
            rest_secs: 75,
            notes: "Amplitude complète, contrôle excentrique",
            progression: rule(3, 2.5),
        },
        ExerciseTemplate {
            id: "curl-marteau",
            name: "Curl Marteau",
            sets: 3,
            reps: "12-15",
            weight: 16.0,
            rest_secs: 60,
            notes: "Cibler brachial et avant-bras",
            progression: rule(4, 1.0),
        },
    ],
};

const JEUDI: DayTemplate = DayTemplate {
    day: "jeudi",
    name: "Jeudi",
    focus: "Quadriceps / Ischio / Fessiers / Mollets",
    warmup: "10min vélo + mobilité hanches + activation fessiers",
    exercises: &[
        ExerciseTemplate {
            id: "squat-barre-haute",
            name: "Squat Barre Haute",
            sets: 5,
            reps: "5",
            weight: 100.0,
            rest_secs: 180,
            notes: "Profondeur ATG si mobilité OK",
            progression: rule(2, 5.0),
        },
        ExerciseTemplate {
            id: "presse-a-cuisses",
            name: "Presse à Cuisses",
            sets: 4,
            reps: "8-10",
            weight: 150.0,
            rest_secs: 120,
            notes: "Amplitude maximale, genoux alignés",
            progression: rule(2, 10.0),
        },
        ExerciseTemplate {
            id: "souleve-de-terre-roumain",
            name: "Soulevé de Terre Roumain",
            sets: 4,
            reps: "8-10",
            weight: 80.0,
            rest_secs: 120,
            notes: "Étirement ischio maximal, dos plat",
            progression: rule(2, 5.0),
        },
        ExerciseTemplate {
            id: "leg-curl-allonge",
            name: "Leg Curl Allongé",
            sets: 3,
            reps: "10-12",
            weight: 40.0,
            rest_secs: 90,
            notes: "Contraction de 1s en haut",
            progression: rule(3, 2.5),
        },
        ExerciseTemplate {
            id: "extension-mollets-assis",
            name: "Extension Mollets Assis",
            sets: 4,
            reps: "12-15",
            weight: 30.0,
            rest_secs: 60,
            notes: "Amplitude complète, pause en haut",
            progression: rule(3, 2.5),
        },
        ExerciseTemplate {
            id: "extension-mollets-debout",
            name: "Extension Mollets Debout",
            sets: 4,
            reps: "15-20",
            weight: 70.0,
            rest_secs: 60,
            notes: "Étirement complet en bas",
            progression: rule(4, 5.0),
        },
        ExerciseTemplate {
            id: "hip-thrust",
            name: "Hip Thrust",
            sets: 3,
            reps: "12-15",
            weight: 60.0,
            rest_secs: 90,
            notes: "Squeeze fessiers en haut 2s",
            progression: rule(3, 5.0),
        },
    ],
};

const MAISON: DayTemplate = DayTemplate {
    day: "maison",
    name: "Maison",
    focus: "Mobilité / Récupération Active / Rappel Musculaire",
    warmup: "5min d'étirements dynamiques",
    exercises: &[
        ExerciseTemplate {
            id: "pompes",
            name: "Pompes",
            sets: 3,
            reps: "15-20",
            weight: 0.0,
            rest_secs: 60,
            notes: "Tempo lent, focus contraction",
            progression: None,
        },
        ExerciseTemplate {
            id: "tractions-australiennes",
            name: "Tractions Australiennes",
            sets: 3,
            reps: "10-15",
            weight: 0.0,
            rest_secs: 60,
            notes: "Barre basse, corps tendu",
            progression: None,
        },
        ExerciseTemplate {
            id: "pike-push-ups",
            name: "Pike Push-Ups",
            sets: 3,
            reps: "12-15",
            weight: 0.0,
            rest_secs: 60,
            notes: "Focus deltoïdes antérieurs",
            progression: None,
        },
        ExerciseTemplate {
            id: "curl-halteres-legers",
            name: "Curl Haltères Légers",
            sets: 3,
            reps: "15-20",
            weight: 8.0,
            rest_secs: 45,
            notes: "Rappel musculaire, pump",
            progression: rule(4, 1.0),
        },
        ExerciseTemplate {
            id: "extensions-triceps-halteres",
            name: "Extensions Triceps Haltères",
            sets: 3,
            reps: "15-20",
            weight: 8.0,
            rest_secs: 45,
            notes: "Amplitude complète",
            progression: rule(4, 1.0),
        },
        ExerciseTemplate {
            id: "planche-abdominale",
            name: "Planche Abdominale",
            sets: 3,
            reps: "45-60s",
            weight: 0.0,
            rest_secs: 45,
            notes: "Gainage maximal, respiration contrôlée",
            progression: None,
        },
        ExerciseTemplate {
            id: "etirements-complets",
            name: "Étirements Complets",
            sets: 1,
            reps: "15min",
            weight: 0.0,
            rest_secs: 0,
            notes: "Tous les groupes musculaires, tenir 30s par étirement",
            progression: None,
        },
    ],
};

pub(crate) const DAY_TEMPLATES: [&DayTemplate; 4] = [&DIMANCHE, &MARDI, &JEUDI, &MAISON];

pub(crate) fn day_template(day: &str) -> Option<&'static DayTemplate> {
    DAY_TEMPLATES
        .iter()
        .copied()
        .find(|template| template.day.eq_ignore_ascii_case(day))
}
