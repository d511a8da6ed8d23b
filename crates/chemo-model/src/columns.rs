//! Column names of the assay table.
//!
//! Raw columns keep the spelling used by the curated source sheets; derived
//! columns are added by the resolvers and the classifier.

// Subject
pub const SPECIES: &str = "species";
pub const GENE_ID: &str = "Gene ID";
pub const UNIPROT_ID: &str = "Uniprot ID";
pub const SEQUENCE: &str = "Sequence";
pub const MUTATION: &str = "Mutation";

// Stimulus
pub const NAME: &str = "Name";
pub const CID: &str = "CID";
pub const CAS: &str = "CAS";
pub const INCHI_KEY: &str = "InChI Key";
pub const CANONICAL_SMILES: &str = "canonicalSMILES";

// Measurement
pub const PARAMETER: &str = "Parameter";
pub const VALUE: &str = "Value";
pub const UNIT: &str = "Unit";
pub const VALUE_SCREEN: &str = "Value_Screen";
pub const UNIT_SCREEN: &str = "Unit_Screen";
pub const RESPONSIVE: &str = "Responsive";
pub const NBR_MEASUREMENTS: &str = "nbr_measurements";
pub const TYPE: &str = "Type";
pub const CELL_LINE: &str = "Cell_line";
pub const CO_TRANSFECTION: &str = "Co_transfection";
pub const ASSAY_SYSTEM: &str = "Assay System";
pub const TAG: &str = "Tag";
pub const GPROTEIN: &str = "Gprotein";
pub const DELIVERY: &str = "Delivery";
pub const ASSAY: &str = "Assay";

// Provenance
pub const REFERENCE: &str = "Reference";
pub const DOI: &str = "DOI";
pub const REFERENCE_POSITION: &str = "Reference Position";

// Derived
pub const UNIPROT_SEQUENCE: &str = "Uniprot_Sequence";
pub const RESOLVED_SEQUENCE: &str = "_Sequence";
pub const RESOLVED_MOLECULE: &str = "_MolID";
pub const MUTATED_SEQUENCE: &str = "mutated_Sequence";
pub const MUTATED_UNIPROT_ID: &str = "mutated_Uniprot ID";
pub const MIXTURE: &str = "Mixture";
pub const BLAST_UNIPROT_ID: &str = "blast_uniprot_id";
pub const BLAST_IDENTITY: &str = "blast_identity";
pub const BLAST_SEQUENCE: &str = "blast_seq";

/// Parameter value marking dose-response (EC50) measurements.
pub const EC50: &str = "ec50";

/// Columns rendered in diagnostic samples before classification.
pub const DIAGNOSTIC_COLUMNS: &[&str] = &[
    SPECIES,
    MUTATION,
    GENE_ID,
    UNIPROT_ID,
    NAME,
    INCHI_KEY,
    PARAMETER,
    VALUE,
    UNIT,
    VALUE_SCREEN,
    UNIT_SCREEN,
    RESPONSIVE,
    REFERENCE,
    DOI,
    REFERENCE_POSITION,
    ASSAY,
    DELIVERY,
    TAG,
    GPROTEIN,
    CELL_LINE,
];

/// Diagnostic columns once the `Mixture` column exists.
pub fn diagnostic_columns_with_mixture() -> Vec<String> {
    DIAGNOSTIC_COLUMNS
        .iter()
        .copied()
        .chain(std::iter::once(MIXTURE))
        .map(str::to_string)
        .collect()
}
