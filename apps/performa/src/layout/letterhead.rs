/// Fixed company text printed on every copy: letterhead, bank details,
/// terms and the signatory line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letterhead {
    pub company_name: String,
    pub address: String,
    pub telephone: String,
    pub mail: String,
    pub gstin: String,
    pub pan: String,
    pub title: String,
    pub bank_lines: Vec<String>,
    pub terms: Vec<String>,
}

impl Letterhead {
    /// "For <company>", printed above the signature space.
    pub fn signatory_caption(&self) -> String {
        format!("For {}", self.company_name)
    }
}

impl Default for Letterhead {
    fn default() -> Self {
        Letterhead {
            company_name: "Pions Technologies Pvt. Ltd.".to_string(),
            address: "Office No.301, Rainbow Plaza, Near Hotel Shivar Garden, Rahatni, Pune - 411017"
                .to_string(),
            telephone: "Telephone No. 9922799835".to_string(),
            mail: "Mail Id: response@pionstechnologies.com".to_string(),
            gstin: "GSTIN Code: 27AAECP2263K1Z9".to_string(),
            pan: "PAN No.: AAECP2263K".to_string(),
            title: "PERFORMA INVOICE".to_string(),
            bank_lines: vec![
                "Bank Name- Axis Bank Ltd.".to_string(),
                "Branch Name- Bund Garden Branch, Pune.411001".to_string(),
                "Account No. 911020065043421".to_string(),
                "Account Type- Current , IFSC Code- UTIB0000073".to_string(),
            ],
            terms: vec![
                "1. Goods once sold will not be returned.".to_string(),
                "2. Make all cheques payable to Pions Technologies Pvt. Ltd.".to_string(),
                "3. All Disputes are subjected to Pune Jurisdiction.".to_string(),
            ],
        }
    }
}
