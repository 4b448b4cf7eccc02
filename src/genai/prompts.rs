//! Prompt builders for the webhook replies.
//!
//! Each webhook has a fixed instruction block; the builders embed the
//! aggregated figures into it. The model is asked for second-person,
//! business-neutral prose with a word limit, and all amounts are presented
//! in Indian rupees.

use crate::models::dealer::DealerDistance;
use crate::services::finance_service::{AccountStatus, FinancialSnapshot};

/// Format a paise amount as rupees with Indian digit grouping,
/// e.g. `1_283_520_000` paise becomes `₹1,28,35,200.00`.
pub fn format_rupees(paise: i64) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.unsigned_abs();
    let rupees = (abs / 100).to_string();
    let paise_part = abs % 100;

    // Indian grouping: the last three digits, then groups of two
    let grouped = if rupees.len() > 3 {
        let (head, tail) = rupees.split_at(rupees.len() - 3);
        let mut groups = Vec::new();
        let mut end = head.len();
        while end > 2 {
            groups.push(&head[end - 2..end]);
            end -= 2;
        }
        groups.push(&head[..end]);
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    } else {
        rupees
    };

    format!("{sign}\u{20B9}{grouped}.{paise_part:02}")
}

/// Prompt for the account health summary.
pub fn account_health(snapshot: &FinancialSnapshot, status: AccountStatus) -> String {
    let mut scheme_lines = String::new();
    for scheme in &snapshot.scheme_returns {
        scheme_lines.push_str(&format!(
            "- {}: one month return {}, trailing twelve month return {}\n",
            scheme.scheme_name,
            format_rupees(scheme.one_month_return_paise),
            format_rupees(scheme.ttm_return_paise),
        ));
    }
    if scheme_lines.is_empty() {
        scheme_lines.push_str("(none)\n");
    }

    format!(
        "You are a chatbot for a bank application and you are required to briefly summarize \
the key insights of the given numerical values in small pointers.
The user's financial details are:
Name: {name}
Total Income: {income}
Total Expenditure: {expenditure}
Total Assets: {assets}
Total Debt: {debt}
Total Investment: {investment}
High Risk Investment: {high_risk}
Average Monthly Balance: {balance}
Average Monthly Expense: {monthly_expense}
Last Month Expense: {last_month_expense}
Account Status: {status}
Mutual fund scheme returns:
{schemes}
Write in a professional and business-neutral tone.
The summary should be in a conversation-like manner based on the Account Status.
The summary should only be based on the information presented above.
Avoid giving advice to the user for improving the Account Status, just include the \
information in short points.
Don't comment on the spendings of the person.
The summary should be in pointers.
The summary should fit in a word limit of 200.
The summary is for {name} to read, so it should be written in a second person perspective tone.
For example the summary must look like:
- Your account status is Healthy.
- Your current balance is \u{20B9}65,00,000.00.
- Your income is \u{20B9}1,28,35,200.00 and your expenditure is \u{20B9}28,73,104.00.
- You have a total asset of \u{20B9}5,65,00,000.00 and a total debt of \u{20B9}0.00.
- You have invested \u{20B9}1,00,000.00 in high risk mutual funds.

The scheme returns are amounts in Indian currency, i.e., \u{20B9}.
If Total Investment is greater than 0: mention the one month return and the trailing \
twelve month return of each scheme in a uniformly formatted table.",
        name = snapshot.first_name,
        income = format_rupees(snapshot.total_income_paise),
        expenditure = format_rupees(snapshot.total_expenditure_paise),
        assets = format_rupees(snapshot.asset_paise),
        debt = format_rupees(snapshot.debt_paise),
        investment = format_rupees(snapshot.total_investment_paise()),
        high_risk = format_rupees(snapshot.high_risk_paise),
        balance = format_rupees(snapshot.liquid_balance_paise),
        monthly_expense = format_rupees(snapshot.average_monthly_expense_paise),
        last_month_expense = format_rupees(snapshot.last_month_expense_paise),
        status = status,
        schemes = scheme_lines,
    )
}

/// Prompt telling a new customer they are not yet eligible for a card.
pub fn new_customer_ineligible() -> &'static str {
    "You are a chatbot for a bank application.
Tell the user politely that they are not eligible for the credit card because they are a \
new customer. Only customers older than one year with the bank are eligible for a credit card.
Ask the user to wait, and ask if they want anything else like mutual funds or a fixed deposit.
Write in a professional and business-neutral tone.
The word limit is 60 words.
The message comes in the middle of a conversation, so don't greet the user with Hello/Hi.
The user lives in India.
The message should be in a conversation-like manner.
The message should be written in a second person perspective tone."
}

/// Prompt recommending the credit card matched to the account status.
pub fn card_recommendation(credit_card: &str) -> String {
    format!(
        "You are a chatbot for a bank application and the user has been matched with the \
credit card {credit_card}.
You have to recommend the given credit card to the user and explain the benefits of the \
credit card.
Write in a professional and business-neutral tone.
The word limit is 100 words.
The message comes in the middle of a conversation, so don't greet the user with Hello/Hi.
The user lives in India.
Assume the currency that you suggest to the user to be Indian Rupees (\u{20B9}).
ONLY USE INDIAN RUPEES (\u{20B9}) EVERYWHERE.
Amounts should be comma separated in the Indian rupee format.
The message should be in a conversation-like manner based on the Account Status.
The message should only be based on the information presented above.
The message should be written in a second person perspective tone."
    )
}

/// Prompt confirming that a card application has been recorded.
pub fn card_recorded() -> &'static str {
    "You are a chatbot for a bank application.
Tell the user that their response has been recorded and they will receive the credit card \
in the next few days.
Thank the user for enrolling with the bank.
Ask the user if there's anything else they want to know.
Write in a professional and business-neutral tone.
The word limit is 50 words.
The message comes in the middle of a conversation, so don't greet the user with Hello/Hi.
The message should be in a conversation-like manner.
The message should be written in a second person perspective tone."
}

/// Prompt listing the nearest partner car dealers.
pub fn dealer_recommendation(shortlist: &[DealerDistance]) -> String {
    let mut dealer_lines = String::new();
    for ranked in shortlist {
        dealer_lines.push_str(&format!(
            "- {} ({}), {}: {} meters away\n",
            ranked.dealer.dealer_name, ranked.dealer.brand, ranked.dealer.address, ranked.meters,
        ));
    }

    format!(
        "You are a chatbot for Cymbal bank. The user is interested in buying a new car. \
Acknowledge that the user is not interested in a Fixed Deposit because they are saving to \
purchase a new car, and provide them information about some partner car dealers near their \
location using the following road distances from the user's address:
{dealer_lines}
Provide the user information about the closest {count} car dealers along with the address \
of their showrooms, with proper spacing and indentation for clear readability. Also provide \
some interesting offers for the bank's customers for each of the dealers in a professional \
and conversation-like manner.
The currency to be used is Indian Rupee, i.e., \u{20B9}.
Write in a professional and business-neutral tone.
Do not greet the user.
The summary should be in a conversation-like manner.
The summary should only be based on the information presented above.
The summary should be in pointers.
The summary is for the user to read, so it should be written in a second person perspective tone.",
        count = shortlist.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dealer::CarDealer;
    use crate::models::investment::SchemeReturn;

    fn snapshot() -> FinancialSnapshot {
        FinancialSnapshot {
            first_name: "Asha".to_string(),
            asset_paise: 56_500_000_00,
            debt_paise: 0,
            liquid_balance_paise: 6_500_000_00,
            fixed_deposit_paise: 1_000_000_00,
            mutual_fund_paise: 400_000_00,
            high_risk_paise: 100_000_00,
            total_income_paise: 12_835_200_00,
            total_expenditure_paise: 2_873_104_00,
            average_monthly_expense_paise: 239_425_33,
            last_month_expense_paise: 215_000_00,
            scheme_returns: vec![SchemeReturn {
                scheme_name: "Bluechip Growth Fund".to_string(),
                one_month_return_paise: 12_500_00,
                ttm_return_paise: 160_000_00,
            }],
        }
    }

    #[test]
    fn format_rupees_uses_indian_grouping() {
        assert_eq!(format_rupees(0), "\u{20B9}0.00");
        assert_eq!(format_rupees(9_99), "\u{20B9}9.99");
        assert_eq!(format_rupees(100_000_00), "\u{20B9}1,00,000.00");
        assert_eq!(format_rupees(1_283_520_000), "\u{20B9}1,28,35,200.00");
        assert_eq!(format_rupees(-1_050), "-\u{20B9}10.50");
    }

    #[test]
    fn account_health_embeds_figures_and_status() {
        let prompt = account_health(&snapshot(), AccountStatus::Healthy);
        assert!(prompt.contains("Name: Asha"));
        assert!(prompt.contains("Total Income: \u{20B9}1,28,35,200.00"));
        assert!(prompt.contains("Account Status: Healthy"));
        assert!(prompt.contains("Bluechip Growth Fund"));
        // Fixed deposit and mutual fund totals roll up into one figure
        assert!(prompt.contains("Total Investment: \u{20B9}14,00,000.00"));
    }

    #[test]
    fn account_health_marks_absent_holdings() {
        let mut empty = snapshot();
        empty.scheme_returns.clear();
        let prompt = account_health(&empty, AccountStatus::Concerning);
        assert!(prompt.contains("(none)"));
    }

    #[test]
    fn card_recommendation_embeds_card_name() {
        let prompt = card_recommendation("Cymbal Luxury Lifestyle Card");
        assert!(prompt.contains("Cymbal Luxury Lifestyle Card"));
    }

    #[test]
    fn dealer_recommendation_lists_every_dealer() {
        let shortlist = vec![
            DealerDistance {
                dealer: CarDealer {
                    brand: "Aria".to_string(),
                    dealer_name: "Velocity Motors".to_string(),
                    address: "4 Residency Road, Bengaluru".to_string(),
                },
                meters: 1200,
            },
            DealerDistance {
                dealer: CarDealer {
                    brand: "Nimbus".to_string(),
                    dealer_name: "Skyline Autos".to_string(),
                    address: "88 Link Road, Bengaluru".to_string(),
                },
                meters: 3400,
            },
        ];
        let prompt = dealer_recommendation(&shortlist);
        assert!(prompt.contains("Velocity Motors"));
        assert!(prompt.contains("Skyline Autos"));
        assert!(prompt.contains("closest 2 car dealers"));
    }
}
