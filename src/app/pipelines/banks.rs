use crate::domain::model::{Category, Institution};
use crate::domain::ports::InstitutionSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use Category::{
    CooperativeBank as Coop, ForeignBank as Foreign, PrivateBank as Private, PsuBank as Psu,
    SmallFinanceBank as Sfb,
};

#[derive(Debug, Clone, Copy)]
pub struct BankEntry {
    pub name: &'static str,
    pub website: &'static str,
    pub category: Category,
    pub pan_india: bool,
}

const fn bank(
    name: &'static str,
    website: &'static str,
    category: Category,
    pan_india: bool,
) -> BankEntry {
    BankEntry {
        name,
        website,
        category,
        pan_india,
    }
}

/// Top 50 banks operating in India.
pub const TOP_BANKS: [BankEntry; 50] = [
    // Large private banks
    bank("HDFC Bank", "https://www.hdfcbank.com", Private, true),
    bank("ICICI Bank", "https://www.icicibank.com", Private, true),
    bank("Axis Bank", "https://www.axisbank.com", Private, true),
    bank("Kotak Mahindra Bank", "https://www.kotak.com", Private, true),
    bank("IndusInd Bank", "https://www.indusind.com", Private, true),
    bank("Yes Bank", "https://www.yesbank.in", Private, true),
    bank("IDFC First Bank", "https://www.idfcfirstbank.com", Private, true),
    bank("Bandhan Bank", "https://www.bandhanbank.com", Private, true),
    bank("RBL Bank", "https://www.rblbank.com", Private, true),
    bank("Federal Bank", "https://www.federalbank.co.in", Private, true),
    // Mid-size private banks
    bank("South Indian Bank", "https://www.southindianbank.com", Private, true),
    bank("Karnataka Bank", "https://karnatakabank.com", Private, true),
    bank("DCB Bank", "https://www.dcbbank.com", Private, true),
    bank("CSB Bank", "https://www.csb.co.in", Private, true),
    bank("City Union Bank", "https://www.cityunionbank.com", Private, true),
    bank("Tamilnad Mercantile Bank", "https://www.tmbank.in", Private, false),
    bank("Karur Vysya Bank", "https://www.kvb.co.in", Private, false),
    bank("Lakshmi Vilas Bank", "https://www.lvbank.com", Private, false),
    bank("Nainital Bank", "https://www.nainitalbank.co.in", Private, false),
    bank("Dhanlaxmi Bank", "https://www.dhanbank.com", Private, false),
    // Small finance banks
    bank("AU Small Finance Bank", "https://www.aubank.in", Sfb, true),
    bank("Ujjivan Small Finance Bank", "https://www.ujjivansfb.in", Sfb, true),
    bank("Equitas Small Finance Bank", "https://www.equitasbank.com", Sfb, true),
    bank("Jana Small Finance Bank", "https://www.janabank.in", Sfb, true),
    bank("ESAF Small Finance Bank", "https://www.esafbank.com", Sfb, false),
    bank("Suryoday Small Finance Bank", "https://www.suryodaybank.com", Sfb, false),
    bank("Utkarsh Small Finance Bank", "https://www.utkarsh.bank", Sfb, false),
    bank("Capital Small Finance Bank", "https://www.capitalbank.co.in", Sfb, false),
    bank("Fincare Small Finance Bank", "https://www.fincarebank.com", Sfb, false),
    bank("Northeast Small Finance Bank", "https://www.nesfb.com", Sfb, false),
    // Payment and niche banks
    bank("IDBI Bank", "https://www.idbibank.in", Private, true),
    bank("Jammu & Kashmir Bank", "https://www.jkbank.com", Private, false),
    bank("Catholic Syrian Bank", "https://www.csb.co.in", Private, false),
    bank("Ratnakar Bank", "https://www.rblbank.com", Private, true),
    bank("Saraswat Bank", "https://www.saraswatbank.com", Coop, false),
    // Foreign banks
    bank("HSBC India", "https://www.hsbc.co.in", Foreign, true),
    bank("Citibank India", "https://www.online.citibank.co.in", Foreign, true),
    bank("Standard Chartered India", "https://www.sc.com/in", Foreign, true),
    bank("DBS Bank India", "https://www.dbs.com/in", Foreign, true),
    bank("Deutsche Bank India", "https://www.db.com/india", Foreign, true),
    bank("Barclays India", "https://home.barclays/india", Foreign, true),
    bank(
        "Bank of America India",
        "https://business.bofa.com/en-us/content/india.html",
        Foreign,
        true,
    ),
    bank("JP Morgan India", "https://www.jpmorgan.com/IN/en/about-us", Foreign, true),
    bank("Mashreq Bank India", "https://www.mashreqbank.com", Foreign, false),
    bank("Emirates NBD India", "https://www.emiratesnbd.com/en/india", Foreign, false),
    // Public sector banks
    bank("State Bank of India", "https://www.onlinesbi.sbi", Psu, true),
    bank("Punjab National Bank", "https://www.pnbindia.in", Psu, true),
    bank("Bank of Baroda", "https://www.bankofbaroda.in", Psu, true),
    bank("Canara Bank", "https://www.canarabank.com", Psu, true),
    bank("Union Bank of India", "https://www.unionbankofindia.co.in", Psu, true),
];

impl BankEntry {
    pub fn to_institution(&self) -> Institution {
        Institution::new(self.name, self.category, self.website).with_pan_india(self.pan_india)
    }
}

/// The built-in bank list. Websites are still validated.
#[derive(Debug, Clone, Default)]
pub struct CuratedBanks;

#[async_trait]
impl InstitutionSource for CuratedBanks {
    fn name(&self) -> &str {
        "banks"
    }

    fn validates(&self) -> bool {
        true
    }

    async fn load(&self) -> Result<Vec<Institution>> {
        let institutions: Vec<Institution> =
            TOP_BANKS.iter().map(BankEntry::to_institution).collect();
        tracing::info!("🏦 Loaded {} curated banks", institutions.len());
        Ok(institutions)
    }
}
