use chrono::{Datelike, NaiveDate};

pub const TIPS: [&str; 5] = [
    "🔍 Learn by teaching someone else!",
    "💡 Always start with the basics before going advanced.",
    "🧠 Space repetition improves long-term memory.",
    "📖 Break big topics into smaller concepts.",
    "📝 Practice quizzes after learning boosts retention.",
];

pub fn tip_of_day(date: NaiveDate) -> &'static str {
    TIPS[date.day() as usize % TIPS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tip_follows_day_of_month() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 7, day).unwrap();
        assert_eq!(tip_of_day(d(5)), TIPS[0]);
        assert_eq!(tip_of_day(d(1)), TIPS[1]);
        assert_eq!(tip_of_day(d(31)), TIPS[1]);
        assert_eq!(tip_of_day(d(14)), TIPS[4]);
    }
}
