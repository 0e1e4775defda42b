use std::collections::HashMap;

use crate::expense::Expense;

/// Width in glyphs of a bar representing 100%.
pub const MAX_BAR_WIDTH: usize = 50;
const BAR_GLYPH: char = '█';

/// Sums amounts per category, in order of each category's first appearance.
pub fn totals_by_category(expenses: &[Expense]) -> Vec<(String, f64)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(String, f64)> = Vec::new();

    for expense in expenses {
        match index.get(expense.category.as_str()) {
            Some(&i) => totals[i].1 += expense.amount,
            None => {
                index.insert(&expense.category, totals.len());
                totals.push((expense.category.clone(), expense.amount));
            }
        }
    }
    totals
}

pub fn grand_total(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

/// The largest expense; the earliest one wins a tie.
pub fn max_expense(expenses: &[Expense]) -> Option<&Expense> {
    expenses.iter().fold(None, |best: Option<&Expense>, e| match best {
        Some(b) if b.amount >= e.amount => Some(b),
        _ => Some(e),
    })
}

/// Share of the grand total per category, as a percentage. All zero when nothing was spent.
pub fn percentage_breakdown(expenses: &[Expense]) -> Vec<(String, f64)> {
    let total = grand_total(expenses);
    totals_by_category(expenses)
        .into_iter()
        .map(|(category, sum)| {
            let percent = if total > 0.0 { sum / total * 100.0 } else { 0.0 };
            (category, percent)
        })
        .collect()
}

pub fn bar_length(percent: f64) -> usize {
    let len = (percent / 100.0 * MAX_BAR_WIDTH as f64).round();
    if len.is_nan() || len <= 0.0 {
        0
    } else {
        (len as usize).min(MAX_BAR_WIDTH)
    }
}

pub fn render_bar(percent: f64) -> String {
    std::iter::repeat_n(BAR_GLYPH, bar_length(percent)).collect()
}

/// Text for the "view totals" screen: categories alphabetically, then the grand total.
pub fn render_totals(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses to show.\n".to_string();
    }

    let mut totals = totals_by_category(expenses);
    totals.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::from("\n----- Expense Totals by Category -----\n");
    for (category, total) in &totals {
        out.push_str(&format!("{}: ${:.2}\n", category, total));
    }
    out.push_str(&format!("\nTotal Spent: ${:.2}\n", grand_total(expenses)));
    out
}

/// Text for the statistics screen: grand total, highest expense and a bar chart by share.
pub fn render_statistics(expenses: &[Expense]) -> String {
    let Some(highest) = max_expense(expenses) else {
        return "No expenses to show statistics for.\n".to_string();
    };

    let mut out = String::from("\n----- Expense Statistics -----\n");
    out.push_str(&format!("Total Spent: ${:.2}\n", grand_total(expenses)));
    out.push_str(&format!(
        "Highest Expense: ${:.2} for {} on {} ({})\n",
        highest.amount, highest.category, highest.date, highest.description
    ));

    // stable sort keeps first-appearance order between equal shares
    let mut breakdown = percentage_breakdown(expenses);
    breakdown.sort_by(|a, b| b.1.total_cmp(&a.1));

    out.push_str("\nSpending Breakdown by Category:\n");
    for (category, percent) in &breakdown {
        out.push_str(&format!("{}: {:.1}% {}\n", category, percent, render_bar(*percent)));
    }
    out
}
