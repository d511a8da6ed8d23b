//! Named rule sets for the pre-format, post-format and optional stages.

use std::fmt;
use std::str::FromStr;

use chemo_model::MixtureClass;
use chemo_model::columns::{
    ASSAY, CELL_LINE, CID, DELIVERY, DOI, EC50, GPROTEIN, INCHI_KEY, MIXTURE, MUTATED_SEQUENCE,
    MUTATED_UNIPROT_ID, MUTATION, NBR_MEASUREMENTS, PARAMETER, REFERENCE, RESOLVED_MOLECULE,
    RESOLVED_SEQUENCE, RESPONSIVE, SEQUENCE, SPECIES, TAG, TYPE, UNIPROT_ID, UNIT, UNIT_SCREEN,
    VALUE, VALUE_SCREEN,
};
use chemo_transform::UNSPECIFIED_STEREO_TOKEN;
use serde::{Deserialize, Serialize};

use crate::config::{
    CastCase, CastTarget, CategoricalCase, ChiralityCase, Condition, ConditionedCase,
    ConsistencyPartition, FormatCase, RuleConfig, RuleKind, RuleSetConfig,
};

pub const INCHI_KEY_PATTERN: &str = r"^([A-Z\-]{27})$";
pub const MUTATION_PATTERN: &str =
    r"^([AGILPVFWYDERHKSTCMNQ][0-9]{1,3}[AGILPVFWYDERHKSTCMNQ])$";
pub const SEQUENCE_PATTERN: &str = r"[AGILPVFWYDERHKSTCMNQ]+";
/// Names suggesting a mixture, e.g. `1(2)` or `1/2`.
pub const MIXTURE_NAME_PATTERN: &str = r"[0-9]\([0-9]\)|[0-9]/[0-9]";
/// Names carrying stereo descriptors.
pub const ISOMER_NAME_PATTERN: &str =
    r"(?i)\([0-9]?[e,z,s,r](,[0-9]?[e,z,s,r])?\)|cis|trans|^d-|^l-|\(\+\)|\(-\)";
/// Gene ids naming a variant, e.g. `OR1A1_D111N`.
pub const GENE_VARIANT_PATTERN: &str = r"_[A-Z][0-9]+";

/// Built-in rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    PreFormat,
    PostFormat,
    Optional,
}

impl Preset {
    pub const fn all() -> &'static [Self] {
        &[Self::PreFormat, Self::PostFormat, Self::Optional]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::PreFormat => "pre_format",
            Self::PostFormat => "post_format",
            Self::Optional => "optional",
        }
    }

    pub fn rule_set(self) -> RuleSetConfig {
        match self {
            Self::PreFormat => pre_format(),
            Self::PostFormat => post_format(),
            Self::Optional => optional(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| format!("unknown rule set preset '{s}'"))
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn not_missing() -> RuleConfig {
    RuleConfig::new(
        "not_missing",
        RuleKind::NotMissing {
            columns: strings(&[
                RESOLVED_MOLECULE,
                PARAMETER,
                RESPONSIVE,
                DOI,
                RESOLVED_SEQUENCE,
                NBR_MEASUREMENTS,
                TYPE,
                ASSAY,
                DELIVERY,
                CELL_LINE,
            ]),
        },
    )
}

fn conditioned_not_missing() -> RuleConfig {
    let case = |parameter: &str, columns: &[&str]| ConditionedCase {
        when: Condition::equals(PARAMETER, parameter),
        columns: strings(columns),
    };
    RuleConfig::new(
        "conditioned_not_missing",
        RuleKind::ConditionedNotMissing {
            cases: vec![
                case(EC50, &[VALUE, UNIT]),
                case("screening", &[VALUE_SCREEN, UNIT_SCREEN]),
                case("rlu/rlumax", &[VALUE_SCREEN, UNIT_SCREEN]),
                case("potential", &[VALUE, UNIT, VALUE_SCREEN, UNIT_SCREEN]),
                case("calcium signal", &[VALUE_SCREEN, UNIT_SCREEN]),
            ],
        },
    )
}

fn castable() -> RuleConfig {
    RuleConfig::new(
        "castable",
        RuleKind::Castable {
            cases: vec![
                CastCase::new(VALUE, CastTarget::Float)
                    .with_except_values(&["n.d"])
                    .with_ignore_substrings(&[">", "<", "-", "."])
                    .with_separator(" "),
                CastCase::new(VALUE_SCREEN, CastTarget::Float).with_separator(" "),
                CastCase::new(RESPONSIVE, CastTarget::Int),
                CastCase::new(CID, CastTarget::Int),
            ],
        },
    )
}

fn not_castable() -> RuleConfig {
    RuleConfig::new(
        "not_castable",
        RuleKind::NotCastable {
            cases: [PARAMETER, UNIT, UNIT_SCREEN, TYPE, REFERENCE, DOI, MIXTURE]
                .into_iter()
                .map(|column| CastCase::new(column, CastTarget::Float))
                .collect(),
        },
    )
}

fn format() -> RuleConfig {
    RuleConfig::new(
        "format",
        RuleKind::Format {
            cases: vec![
                FormatCase::new(INCHI_KEY, INCHI_KEY_PATTERN, " "),
                FormatCase::new(MUTATION, MUTATION_PATTERN, "_"),
                FormatCase::new(SEQUENCE, SEQUENCE_PATTERN, " "),
            ],
        },
    )
}

fn value_categorical() -> RuleConfig {
    RuleConfig::new(
        "value_categorical",
        RuleKind::Categorical {
            cases: vec![
                CategoricalCase::new(
                    TYPE,
                    &["Ca2+", "Luc", "cAMP", "SEAP", "I", "Conductance", "GFP"],
                ),
                CategoricalCase::new(
                    CELL_LINE,
                    &[
                        "HEK",
                        "H3A",
                        "Ocy",
                        "OSN",
                        "OB",
                        "HeLa/Olf",
                        "NxG108CC15",
                        "ScL21",
                        "Yeast",
                        "HEPG2",
                        "HUH7",
                        "LNCAP",
                    ],
                ),
                CategoricalCase::new(ASSAY, &["in vitro", "in vivo", "ex vivo"]),
                CategoricalCase::new(DELIVERY, &["liquid", "gaz"]),
                CategoricalCase::new(GPROTEIN, &["olf", "gα15/gα16", "gα16", "gαq"]),
                CategoricalCase::new(
                    TAG,
                    &["rho", "myc", "flag", "rho lucy", "gfp", "il-6-halotag"],
                ),
                CategoricalCase::new(
                    PARAMETER,
                    &[EC50, "raw", "norm_other", "norm_pair", "norm_rec", "norm_mol"],
                ),
            ],
        },
    )
}

fn mutated_sequence_consistency() -> RuleConfig {
    RuleConfig::new(
        "mutated_sequence_consistency",
        RuleKind::Consistency {
            partitions: vec![
                ConsistencyPartition::new(&[MUTATED_SEQUENCE, SPECIES], MUTATED_UNIPROT_ID)
                    .requiring(&[UNIPROT_ID])
                    .skipping_missing_keys(),
                ConsistencyPartition::new(&[MUTATED_UNIPROT_ID], MUTATED_SEQUENCE)
                    .requiring(&[UNIPROT_ID])
                    .skipping_missing_keys(),
            ],
        },
    )
}

fn response_consistency() -> RuleConfig {
    let keys = [MUTATED_SEQUENCE, INCHI_KEY, DOI, VALUE_SCREEN, TAG, CELL_LINE];
    RuleConfig::new(
        "response_consistency",
        RuleKind::Consistency {
            partitions: vec![
                ConsistencyPartition::new(&keys, RESPONSIVE)
                    .with_filter(Condition::equals(PARAMETER, EC50)),
                ConsistencyPartition::new(&keys, RESPONSIVE)
                    .with_filter(Condition::not_equals(PARAMETER, EC50)),
            ],
        },
    )
}

fn sequence_length(min: usize, max: usize) -> RuleConfig {
    RuleConfig::new("sequence_length", RuleKind::SequenceLength { min, max }).report_only()
}

fn chirality(name: &str, cases: &[(MixtureClass, bool)]) -> RuleConfig {
    RuleConfig::new(
        name,
        RuleKind::Chirality {
            cases: cases
                .iter()
                .map(|&(class, achiral)| ChiralityCase { class, achiral })
                .collect(),
        },
    )
}

fn pre_format() -> RuleSetConfig {
    RuleSetConfig::new(
        Preset::PreFormat.name(),
        vec![
            not_missing(),
            RuleConfig::new("structure_separator", RuleKind::StructureSeparator),
            conditioned_not_missing(),
            castable(),
            not_castable(),
            format(),
            RuleConfig::new("known_identifier", RuleKind::KnownIdentifier),
            RuleConfig::new("mutation_correctness", RuleKind::MutationCorrectness),
            mutated_sequence_consistency(),
            sequence_length(200, 380),
            RuleConfig::new("ec50_non_zero", RuleKind::Ec50NonZero),
            value_categorical(),
            RuleConfig::new(
                "mutation_from_gene_id",
                RuleKind::MutationFromGeneId {
                    pattern: GENE_VARIANT_PATTERN.to_string(),
                },
            ),
        ],
    )
}

fn post_format() -> RuleSetConfig {
    let mut rules = Vec::new();
    for rule in pre_format().rules {
        let name = rule.name.clone();
        rules.push(rule);
        match name.as_str() {
            "format" => rules.push(RuleConfig::new("mixture_format", RuleKind::MixtureFormat)),
            "known_identifier" => rules.push(chirality(
                "chirality",
                &[(MixtureClass::Mono, true), (MixtureClass::SumOfIsomers, false)],
            )),
            "mutated_sequence_consistency" => {
                rules.push(response_consistency());
                rules.push(RuleConfig::new(
                    "mixture_name",
                    RuleKind::NamePattern {
                        pattern: MIXTURE_NAME_PATTERN.to_string(),
                        require_identifier_token: None,
                    },
                ));
            }
            _ => {}
        }
    }
    RuleSetConfig::new(Preset::PostFormat.name(), rules)
}

fn optional() -> RuleSetConfig {
    let rules = vec![
        RuleConfig::new(
            "alignment_identity",
            RuleKind::AlignmentIdentity { min_identity: 96.0 },
        ),
        chirality("mixture_chirality", &[(MixtureClass::Mixture, true)]),
        RuleConfig::new("name_synonyms", RuleKind::NameSynonyms),
        sequence_length(300, 330),
        RuleConfig::new(
            "isomer_name",
            RuleKind::NamePattern {
                pattern: ISOMER_NAME_PATTERN.to_string(),
                require_identifier_token: Some(
                    UNSPECIFIED_STEREO_TOKEN.trim_matches('-').to_string(),
                ),
            },
        ),
    ];
    RuleSetConfig::new(
        Preset::Optional.name(),
        rules.into_iter().map(RuleConfig::report_only).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_format_extends_pre_format_in_place() {
        let names = post_format().rule_names().join(",");
        assert_eq!(
            names,
            "not_missing,structure_separator,conditioned_not_missing,castable,not_castable,\
             format,mixture_format,known_identifier,chirality,mutation_correctness,\
             mutated_sequence_consistency,response_consistency,mixture_name,sequence_length,\
             ec50_non_zero,value_categorical,mutation_from_gene_id"
        );
    }

    #[test]
    fn optional_rules_never_prune() {
        assert!(optional().rules.iter().all(|rule| !rule.prune));
    }

    #[test]
    fn preset_names_round_trip() {
        for preset in Preset::all() {
            assert_eq!(preset.name().parse::<Preset>(), Ok(*preset));
        }
        assert!("unknown".parse::<Preset>().is_err());
    }
}
