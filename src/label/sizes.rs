//! Built-in label size table.
//!
//! Printable areas are in dots at 300 DPI. Endless tapes list a printable
//! length of 0 because their length follows the content.

use super::{LabelKind, LabelSpec};

const ENDLESS: &[(&str, &str, u32)] = &[
    ("12", "12mm endless", 106),
    ("29", "29mm endless", 306),
    ("38", "38mm endless", 413),
    ("50", "50mm endless", 554),
    ("54", "54mm endless", 590),
    ("62", "62mm endless", 696),
    ("102", "102mm endless", 1164),
];

const DIE_CUT: &[(&str, &str, u32, u32)] = &[
    ("17x54", "17mm x 54mm die-cut", 165, 566),
    ("17x87", "17mm x 87mm die-cut", 165, 956),
    ("23x23", "23mm x 23mm die-cut", 202, 202),
    ("29x42", "29mm x 42mm die-cut", 306, 425),
    ("29x90", "29mm x 90mm die-cut", 306, 991),
    ("39x90", "38mm x 90mm die-cut", 413, 991),
    ("39x48", "39mm x 48mm die-cut", 425, 495),
    ("52x29", "52mm x 29mm die-cut", 578, 271),
    ("62x29", "62mm x 29mm die-cut", 696, 271),
    ("62x100", "62mm x 100mm die-cut", 696, 1109),
    ("102x51", "102mm x 51mm die-cut", 1164, 526),
    ("102x152", "102mm x 153mm die-cut", 1164, 1660),
];

const ROUND_DIE_CUT: &[(&str, &str, u32)] = &[
    ("d12", "12mm round die-cut", 94),
    ("d24", "24mm round die-cut", 236),
    ("d58", "58mm round die-cut", 618),
];

pub(super) fn builtin_specs() -> Vec<LabelSpec> {
    let endless = ENDLESS
        .iter()
        .map(|&(id, name, w)| LabelSpec::new(id, name, LabelKind::Endless, w, 0));
    let die_cut = DIE_CUT
        .iter()
        .map(|&(id, name, w, h)| LabelSpec::new(id, name, LabelKind::DieCut, w, h));
    let round = ROUND_DIE_CUT
        .iter()
        .map(|&(id, name, d)| LabelSpec::new(id, name, LabelKind::RoundDieCut, d, d));

    endless.chain(die_cut).chain(round).collect()
}
