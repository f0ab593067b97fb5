//! Render a day's enrichment into the event description.
//!
//! Sections appear in a fixed order and empty ones are left out:
//! festival, lunar date, stems-and-branches, notes, suitable, avoid.

use crate::almanac::AlmanacDay;
use crate::enrich::{Enrichment, Note};

const FESTIVAL: (&str, &str) = ("🎉", "节日");
const FESTIVAL_DETAIL: (&str, &str) = ("🏮", "节庆");
const LUNAR_DATE: (&str, &str) = ("📅", "农历");
const GANZHI: (&str, &str) = ("🀄", "干支");
const SOLAR_TERM: (&str, &str) = ("🌾", "节气");
const DEITY: (&str, &str) = ("🙏", "神诞");
const SUITABLE: (&str, &str) = ("✅", "宜");
const AVOID: (&str, &str) = ("❌", "忌");

pub fn compose(day: &AlmanacDay, enrichment: &Enrichment) -> String {
    let mut lines: Vec<String> = Vec::new();

    push_line(&mut lines, FESTIVAL, &enrichment.festival_name);
    push_line(&mut lines, FESTIVAL_DETAIL, &enrichment.festival_detail);
    push_line(&mut lines, LUNAR_DATE, &day.lunar_date());

    if let Some(ref ganzhi) = enrichment.ganzhi {
        push_line(&mut lines, GANZHI, ganzhi);
    }

    for note in &enrichment.notes {
        match note {
            Note::SolarTerm { term, text } => {
                push_line(&mut lines, SOLAR_TERM, &format!("{}：{}", term, text))
            }
            Note::Deity { date, text } => {
                push_line(&mut lines, DEITY, &format!("{}：{}", date, text))
            }
        }
    }

    push_line(&mut lines, SUITABLE, &day.suitable);
    push_line(&mut lines, AVOID, &day.avoid);

    let mut description = lines.join("\n");
    if !description.is_empty() {
        description.push('\n');
    }
    description
}

fn push_line(lines: &mut Vec<String>, (glyph, label): (&str, &str), text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    lines.push(format!("{} **{}**: {}", glyph, label, text));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::almanac::Festivals;

    fn make_test_day() -> AlmanacDay {
        AlmanacDay {
            epoch_seconds: 1735689600,
            lunar_month: "腊".to_string(),
            lunar_day: "初一".to_string(),
            festivals: Festivals::None,
            suitable: "祭祀".to_string(),
            avoid: "安床".to_string(),
        }
    }

    #[test]
    fn test_compose_minimal_day() {
        let description = compose(&make_test_day(), &Enrichment::default());

        assert_eq!(
            description,
            "📅 **农历**: 腊月初一\n✅ **宜**: 祭祀\n❌ **忌**: 安床\n"
        );
    }

    #[test]
    fn test_compose_section_order() {
        let enrichment = Enrichment {
            festival_name: "元旦".to_string(),
            festival_detail: "腊八节".to_string(),
            ganzhi: Some("壬戌日".to_string()),
            notes: vec![
                Note::SolarTerm {
                    term: "冬至".to_string(),
                    text: "祭祖".to_string(),
                },
                Note::Deity {
                    date: "腊八".to_string(),
                    text: "成道日".to_string(),
                },
            ],
        };

        let description = compose(&make_test_day(), &enrichment);
        let lines: Vec<&str> = description.lines().collect();

        assert_eq!(
            lines,
            vec![
                "🎉 **节日**: 元旦",
                "🏮 **节庆**: 腊八节",
                "📅 **农历**: 腊月初一",
                "🀄 **干支**: 壬戌日",
                "🌾 **节气**: 冬至：祭祖",
                "🙏 **神诞**: 腊八：成道日",
                "✅ **宜**: 祭祀",
                "❌ **忌**: 安床",
            ]
        );
        assert!(description.ends_with('\n'));
    }

    #[test]
    fn test_compose_omits_blank_activities() {
        let mut day = make_test_day();
        day.suitable = "  ".to_string();
        day.avoid = String::new();

        let description = compose(&day, &Enrichment::default());
        assert_eq!(description, "📅 **农历**: 腊月初一\n");
    }
}
