//! Classification prompts.
//!
//! Fixed system instructions, one per dataset. The user message is built by
//! the batch classifier: every batch member rendered via
//! [`crate::traits::item::Item::prompt_block`] under a local `[n]` marker.

/// System instruction for USMLE question classification.
///
/// Asks for a JSON array, one object per question in batch order.
pub const USMLE_SYSTEM_PROMPT: &str = "\
You are a medical specialty classifier. You will receive a numbered list of \
USMLE-style clinical questions. For EACH question, determine whether it \
primarily belongs to Obstetrics & Gynecology (OBGYN).

Classify each into ONE category:

- OBSTETRICS: pregnancy, labor, delivery, postpartum care, prenatal screening, \
fetal development, obstetric complications (preeclampsia, ectopic pregnancy, \
placenta previa, gestational diabetes, HELLP, etc.)
- GYNECOLOGY: menstrual disorders, PCOS, endometriosis, fibroids, pelvic \
inflammatory disease, ovarian/cervical/uterine pathology, gynecologic oncology, \
pelvic floor disorders, vulvovaginal conditions
- REPRODUCTIVE_HEALTH: contraception, family planning, infertility, assisted \
reproduction, menopause, hormone replacement therapy, STIs in reproductive context
- NONE: not primarily an OBGYN question. Even if the patient is female or \
pregnant, if the core medical concept being tested is from another specialty \
(e.g. a pregnant woman with a UTI testing antibiotic knowledge, or a woman \
with chest pain testing cardiology), classify as NONE.

Respond with a JSON array, one object per question in order:
[{\"id\": 0, \"is_obgyn\": true/false, \"category\": \"...\"}, ...]";

/// System instruction for clinical vignette classification.
///
/// Asks for one `INDEX|YES|CATEGORY` line per scenario in batch order.
pub const VIGNETTE_SYSTEM_PROMPT: &str = "\
You are a clinical classifier. You will receive a numbered batch of clinical \
scenarios from a Kenyan primary care setting. Determine whether EACH is \
related to ANY of the following categories:

1. MATERNAL - pregnancy, childbirth, antenatal/postnatal care, obstetric \
complications, maternal health
2. NEONATAL - care of newborns (0-28 days), neonatal sepsis, jaundice, \
prematurity
3. CHILD_HEALTH - health of children/infants/adolescents (under 18), \
pediatric conditions, immunization, growth/nutrition
4. SRH - sexual and reproductive health: family planning, contraception, \
STIs, gynecology, GBV/defilement, menstrual disorders

For EACH scenario, respond with EXACTLY one line in this format:
INDEX|YES|CATEGORY  or  INDEX|NO|NONE

Where INDEX is the [n] marker of the scenario and CATEGORY is one of: \
MATERNAL, NEONATAL, CHILD_HEALTH, SRH
If it fits multiple categories, pick the PRIMARY one.

Examples of classification:
- Pregnant woman with eclampsia -> 0|YES|MATERNAL
- 10-day-old baby with fever and jaundice -> 1|YES|NEONATAL
- 5-year-old with pneumonia -> 2|YES|CHILD_HEALTH
- Woman seeking family planning advice -> 3|YES|SRH
- 45-year-old man with chest pain -> 4|NO|NONE

Return one line per scenario, in the same order. No extra text.";
