//! Dutch naming for accounts and cost categories.
//!
//! Odoo returns English account names for the LAB administrations; the
//! dashboard presents everything in Dutch (nl_NL context). Lookup is exact
//! first, then partial so composed names like "Gross wages 2026" still get
//! translated in place.

/// Category names keyed by the first two digits of the account code.
const CATEGORY_TRANSLATIONS: &[(&str, &str)] = &[
    ("40", "Personeelskosten"),
    ("41", "Huisvestingskosten"),
    ("42", "Vervoerskosten"),
    ("43", "Kantoorkosten"),
    ("44", "Marketing & Reclame"),
    ("45", "Algemene Kosten"),
    ("46", "Overige Bedrijfskosten"),
    ("47", "Financiële Lasten"),
    ("48", "Afschrijvingen"),
    ("49", "Overige Kosten"),
    ("70", "Kostprijs Verkopen"),
    ("71", "Kostprijs Verkopen"),
    ("72", "Kostprijs Verkopen"),
    ("73", "Kostprijs Verkopen"),
    ("74", "Kostprijs Verkopen"),
    ("75", "Kostprijs Verkopen"),
    ("80", "Omzet"),
    ("81", "Omzet"),
    ("82", "Omzet"),
    ("83", "Omzet"),
    ("84", "Omzet"),
    ("85", "Omzet"),
];

const ACCOUNT_TRANSLATIONS: &[(&str, &str)] = &[
    // Personeelskosten (40)
    ("Gross wages", "Brutolonen"),
    ("Bonuses and commissions", "Bonussen en provisies"),
    ("Holiday allowance", "Vakantietoeslag"),
    ("Employer's share of payroll taxes", "Werkgeverslasten loonheffing"),
    ("Employer's share of pensions", "Pensioenpremie werkgever"),
    ("Compensation for commuting", "Reiskostenvergoeding"),
    ("Management fees", "Managementvergoeding"),
    ("Staff on loan", "Ingehuurd personeel"),
    ("Sick leave insurance", "Verzuimverzekering"),
    ("Canteen costs", "Kantinekosten"),
    ("Study and training costs", "Opleidingskosten"),
    ("Other personnel costs", "Overige personeelskosten"),
    ("Temporary staff", "Uitzendkrachten"),
    // Huisvestingskosten (41)
    ("Property rental", "Huur bedrijfspand"),
    ("Small property maintenance", "Klein onderhoud pand"),
    ("Cleaning and window cleaning", "Schoonmaak en glazenwassen"),
    ("Gas", "Gas"),
    ("Electricity", "Elektriciteit"),
    ("Water", "Water"),
    ("Property insurance", "Opstalverzekering"),
    ("Property taxes", "Onroerendezaakbelasting"),
    // Vervoerskosten (42)
    ("Car leasing", "Autoleasing"),
    ("Fuel costs", "Brandstofkosten"),
    ("Motor vehicle insurance", "Motorrijtuigenverzekering"),
    ("Motor vehicle tax", "Motorrijtuigenbelasting"),
    ("Transport costs", "Transportkosten"),
    ("Parking costs", "Parkeerkosten"),
    // Kantoorkosten (43)
    ("Office supplies", "Kantoorbenodigdheden"),
    ("Telephone and fax", "Telefoon en fax"),
    ("Internet costs", "Internetkosten"),
    ("Software", "Software"),
    ("Computer costs", "Computerkosten"),
    // Marketing & Reclame (44)
    ("Advertising costs", "Advertentiekosten"),
    ("Promotional material", "Promotiemateriaal"),
    ("Website costs", "Websitekosten"),
    ("Sponsoring", "Sponsoring"),
    // Algemene Kosten (45)
    ("External advice", "Extern advies"),
    ("Accountant costs", "Accountantskosten"),
    ("Legal costs", "Juridische kosten"),
    ("Administration costs", "Administratiekosten"),
    ("Collection costs", "Incassokosten"),
    // Overige Bedrijfskosten (46)
    ("Bank charges", "Bankkosten"),
    ("Insurance", "Verzekeringen"),
    ("Subscriptions and memberships", "Abonnementen en lidmaatschappen"),
    ("Entertainment expenses", "Representatiekosten"),
    // Financiële Lasten (47)
    ("Interest expenses", "Rentelasten"),
    ("Exchange differences", "Koersverschillen"),
    // Afschrijvingen (48)
    ("Depreciation of buildings", "Afschrijving gebouwen"),
    ("Depreciation of furniture and fixtures", "Afschrijving inventaris"),
    ("Depreciation of computer equipment", "Afschrijving computers"),
    // Omzet (80)
    ("Product sales", "Productverkopen"),
    ("Service revenue", "Omzet diensten"),
    ("Domestic sales", "Binnenlandse verkopen"),
    ("Intercompany sales", "Intercompany verkopen"),
    // Kostprijs verkopen (70)
    ("Cost of goods sold", "Kostprijs verkopen"),
    ("Cost of materials", "Materiaalkosten"),
    ("Direct labour costs", "Directe loonkosten"),
    ("Subcontracting", "Uitbesteed werk"),
    // Balansposten
    ("Accounts receivable", "Debiteuren"),
    ("Accounts payable", "Crediteuren"),
    ("Bank", "Bank"),
    ("Cash", "Kas"),
    ("VAT receivable", "Te vorderen BTW"),
    ("VAT payable", "Af te dragen BTW"),
    ("Inventory", "Voorraad"),
    // Intercompany
    ("Intercompany receivables", "Vordering groepsmaatschappijen"),
    ("Intercompany payables", "Schuld groepsmaatschappijen"),
    ("Current account", "Rekening-courant"),
];

/// Translates an English account name to Dutch when a translation exists.
pub fn translate_account_name(name: &str) -> String {
    if name.is_empty() {
        return name.to_string();
    }

    for (english, dutch) in ACCOUNT_TRANSLATIONS {
        if *english == name {
            return (*dutch).to_string();
        }
    }

    let lowered = name.to_lowercase();
    for (english, dutch) in ACCOUNT_TRANSLATIONS {
        if lowered.contains(&english.to_lowercase()) {
            return name.replace(english, dutch);
        }
    }

    name.to_string()
}

/// Dutch category name for an account code, based on its 2-digit prefix.
pub fn category_name(account_code: &str) -> String {
    if account_code.len() < 2 {
        return "Overig".to_string();
    }
    let prefix = &account_code[..2];
    CATEGORY_TRANSLATIONS
        .iter()
        .find(|(code, _)| *code == prefix)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| format!("Categorie {}", prefix))
}
