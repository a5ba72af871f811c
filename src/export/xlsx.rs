use color_eyre::Result;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook};

use crate::models::QuestionType;

use super::{ReportData, REPORT_TITLE};

const HEADER_FILL: Color = Color::RGB(0x4472C4);
const TOTAL_FILL: Color = Color::RGB(0xE7E6E6);

/// Options shown in the detail sheet, three columns each.
const DETAIL_OPTION_SLOTS: usize = 4;

pub fn build_excel(data: &ReportData<'_>) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let title_format = Format::new().set_bold().set_font_size(16);
    let header_format = Format::new().set_bold().set_font_size(12);
    let table_header_format = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_background_color(HEADER_FILL)
        .set_align(FormatAlign::Center);
    let centered = Format::new().set_align(FormatAlign::Center);
    let total_format = Format::new()
        .set_bold()
        .set_background_color(TOTAL_FILL)
        .set_align(FormatAlign::Center);

    // 統計總覽
    let summary = workbook.add_worksheet();
    summary.set_name("統計總覽")?;

    summary.write_string_with_format(0, 0, REPORT_TITLE, &title_format)?;
    summary.write_string(2, 0, "統計期間：")?;
    summary.write_string(2, 1, &data.period)?;
    summary.write_string(3, 0, "總回應數：")?;
    summary.write_number(3, 1, data.total_responses as f64)?;
    summary.write_string(4, 0, "問題總數：")?;
    summary.write_number(4, 1, data.total_questions as f64)?;
    summary.write_string(5, 0, "平均分數：")?;
    summary.write_string(5, 1, &format!("{:.1}", data.avg_score))?;

    summary.write_string_with_format(7, 0, "參與者分數分布統計", &header_format)?;
    summary.write_string_with_format(8, 0, "分數", &table_header_format)?;
    summary.write_string_with_format(8, 1, "人數", &table_header_format)?;
    summary.write_string_with_format(8, 2, "百分比", &table_header_format)?;

    let mut row = 9;
    for bucket in data.observed_buckets {
        summary.write_string_with_format(row, 0, &format!("{}分", bucket.score), &centered)?;
        summary.write_number_with_format(row, 1, bucket.count as f64, &centered)?;
        summary.write_string_with_format(row, 2, &format!("{:.1}%", bucket.percentage), &centered)?;
        row += 1;
    }

    summary.write_string_with_format(row, 0, "總計", &total_format)?;
    summary.write_number_with_format(row, 1, data.total_responses as f64, &total_format)?;
    summary.write_string_with_format(row, 2, "100.0%", &total_format)?;

    summary.set_column_width(0, 14)?;
    summary.set_column_width(1, 22)?;
    summary.set_column_width(2, 12)?;

    // 詳細統計
    let detail = workbook.add_worksheet();
    detail.set_name("詳細統計")?;

    let mut headers = vec![
        "問題編號".to_string(),
        "問題內容".to_string(),
        "問題類型".to_string(),
        "總回答數".to_string(),
        "正確答案數".to_string(),
        "正確率(%)".to_string(),
    ];
    for slot in 1..=DETAIL_OPTION_SLOTS {
        headers.push(format!("選項{slot}"));
        headers.push(format!("選項{slot}人數"));
        headers.push(format!("選項{slot}比例(%)"));
    }

    for (col, header) in headers.iter().enumerate() {
        detail.write_string_with_format(0, col as u16, header, &table_header_format)?;
    }

    for (idx, question) in data.breakdown.iter().enumerate() {
        let row = idx as u32 + 1;
        let type_label = match QuestionType::parse(&question.question_type) {
            Some(QuestionType::Multiple) => "多選題",
            _ => "單選題",
        };

        detail.write_number(row, 0, question.order as f64)?;
        detail.write_string(row, 1, &question.content)?;
        detail.write_string(row, 2, type_label)?;
        detail.write_number(row, 3, question.total_answers as f64)?;
        detail.write_number(row, 4, question.correct_answers as f64)?;
        detail.write_string(row, 5, &format!("{:.1}", question.correct_rate))?;

        for (slot, option) in question.option_stats.iter().take(DETAIL_OPTION_SLOTS).enumerate() {
            let col = 6 + (slot as u16) * 3;
            detail.write_string(row, col, &option.option)?;
            detail.write_number(row, col + 1, option.count as f64)?;
            detail.write_string(row, col + 2, &format!("{:.1}", option.percentage))?;
        }
    }

    detail.set_column_width(1, 50)?;
    for slot in 0..DETAIL_OPTION_SLOTS as u16 {
        detail.set_column_width(6 + slot * 3, 24)?;
    }

    let bytes = workbook.save_to_buffer()?;
    Ok(bytes)
}
