//! Poverty Data Explorer of the Luxembourg Income Study.
//!
//! On top of the welfare and equivalence-scale sheets this explorer iterates
//! two poverty-line sheets: `povlines_abs` (absolute dollar-a-day lines,
//! whose `dollars_text` column is kept as text so "2.15" never turns into a
//! float) and `povlines_rel` (shares of median income). Absolute lines feed
//! slug suffixes through their `cents` column, so `$2.15` becomes
//! `headcount_ratio_<welfare>_<scale>_215`.

use serde_json::Value;

use super::capitalize;
use crate::error::PipelineError;
use crate::grid::{cartesian2, cartesian3, Row, Table};
use crate::sheets::{self, ReadOptions, RefTable, SheetRef};
use crate::tsv::Explorer;

pub const SLUG: &str = "lis-poverty";

const SHEET_ID: &str = "1UFdwB1iBpP2tEP6GtxCHvW1GGhjsFflh42FWR80rYIg";

const SOURCE_NAME: &str = "Luxembourg Income Study (2023)";
const DATA_PUBLISHED_BY: &str = "Luxembourg Income Study (LIS) Database, http://www.lisdatacenter.org (multiple countries; 1967-2020). Luxembourg, LIS.";
const SOURCE_LINK: &str = "https://www.lisdatacenter.org/our-data/lis-database/";
const COLOR_SCALE_NUMERIC_MIN_VALUE: i64 = 0;
const TOLERANCE: i64 = 5;
const COLOR_SCALE_EQUAL_SIZE_BINS: &str = "true";
const Y_AXIS_MIN: i64 = 0;
const MAP_TARGET_TIME: i64 = 2019;

const NEW_LINE: &str = "<br><br>";

const PPP_NOTE: &str = "This data is measured in international-$ at 2017 prices to account for \
                        inflation and differences in the cost of living between countries.";

const SHORTFALL_NOTE: &str = "This data is expressed in international-$ at 2017 prices. The cost \
                              of closing the poverty gap does not take into account costs and \
                              inefficiencies from making the necessary transfers.";

const HEADCOUNT_BINS: &str = "3;10;20;30;40;50;60;70;80;90;100";
const HEADCOUNT_ABS_BINS: &str =
    "100000;300000;1000000;3000000;10000000;30000000;100000000;300000000;1000000000";
const HEADCOUNT_REL_BINS: &str = "5;10;15;20;25;30";

/// Fetch the reference sheets and assemble the explorer.
pub async fn build(client: &reqwest::Client) -> Result<Explorer, PipelineError> {
    let welfare = sheets::fetch(
        client,
        &SheetRef::new(SHEET_ID, "welfare"),
        &ReadOptions::default(),
    )
    .await?;
    let scales = sheets::fetch(
        client,
        &SheetRef::new(SHEET_ID, "equivalence_scales"),
        &ReadOptions::default(),
    )
    .await?;
    let povlines_abs = sheets::fetch(
        client,
        &SheetRef::new(SHEET_ID, "povlines_abs"),
        &ReadOptions::default().string_column("dollars_text"),
    )
    .await?;
    let povlines_rel = sheets::fetch(
        client,
        &SheetRef::new(SHEET_ID, "povlines_rel"),
        &ReadOptions::default(),
    )
    .await?;
    let tables = sheets::fetch(
        client,
        &SheetRef::new(SHEET_ID, "tables"),
        &ReadOptions::default(),
    )
    .await?;
    assemble(&welfare, &scales, &povlines_abs, &povlines_rel, &tables)
}

/// Assemble the explorer from already-loaded reference tables.
pub fn assemble(
    welfare: &RefTable,
    scales: &RefTable,
    povlines_abs: &RefTable,
    povlines_rel: &RefTable,
    tables: &RefTable,
) -> Result<Explorer, PipelineError> {
    let mut explorer = Explorer::new();
    push_header(&mut explorer);

    let columns = column_definitions(welfare, scales, povlines_abs, povlines_rel, tables)?;
    let mut graphers = grapher_views(welfare, scales, povlines_abs, povlines_rel, tables)?;

    // Rows with empty ySlugs make the checkbox system fail in the consuming
    // tool.
    graphers.retain(|i, g| !g.text(i, "ySlugs").is_empty());

    graphers.set_constant("relatedQuestionText", Value::Null);
    graphers.set_constant("relatedQuestionUrl", Value::Null);
    graphers.set_constant("yAxisMin", Value::from(Y_AXIS_MIN));
    graphers.set_constant("mapTargetTime", Value::from(MAP_TARGET_TIME));
    graphers.cast_integer("mapTargetTime")?;
    graphers.mark_default_view(&[
        ("Metric Dropdown", "Share in poverty"),
        ("Poverty line Dropdown", "$2.15 per day"),
        ("Income measure Dropdown", "After tax"),
        ("Equivalence scale Dropdown", "Equivalized"),
    ])?;
    explorer.set_graphers(graphers);

    for tab in tables.rows() {
        let name = tab.text("name")?;
        explorer.add_table(tab.text("link")?, name.as_str(), columns.subset("tableSlug", &name));
    }
    Ok(explorer)
}

fn push_header(explorer: &mut Explorer) {
    explorer.set_header(
        "explorerTitle",
        "Poverty Data Explorer of the Luxembourg Income Study",
    );
    explorer.set_header_list(
        "selection",
        ["Chile", "Brazil", "South Africa", "United States", "France", "China"],
    );
    explorer.set_header("explorerSubtitle", "");
    explorer.set_header("isPublished", "true");
    explorer.set_header(
        "googleSheet",
        format!("https://docs.google.com/spreadsheets/d/{SHEET_ID}"),
    );
    explorer.set_header("wpBlockId", "");
    explorer.set_header("entityType", "country or region");
    explorer.set_header(
        "pickerColumnSlugs",
        "headcount_ratio_dhi_eq_215 headcount_dhi_eq_215 headcount_ratio_50_median_dhi_eq",
    );
}

fn column_definitions(
    welfare: &RefTable,
    scales: &RefTable,
    povlines_abs: &RefTable,
    povlines_rel: &RefTable,
    tables: &RefTable,
) -> Result<Table, PipelineError> {
    let mut t = Table::new();

    for tab in tables.rows() {
        let table_slug = tab.text("name")?;

        t.push(
            Row::new()
                .set("name", "Country")
                .set("slug", "country")
                .set("type", "EntityName")
                .set("tableSlug", table_slug.as_str()),
        );
        t.push(
            Row::new()
                .set("name", "Year")
                .set("slug", "year")
                .set("type", "Year")
                .set("tableSlug", table_slug.as_str()),
        );

        for (wel, eq, p) in cartesian3(welfare, scales, povlines_abs) {
            let wslug = wel.text("slug")?;
            let wtype = wel.text("welfare_type")?;
            let technical = wel.text("technical_text")?;
            let subtitle = wel.text("subtitle")?;
            let eslug = eq.text("slug")?;
            let etext = eq.text("text")?;
            let edesc = eq.text("description")?;
            let dollars = p.text("dollars_text")?;
            let cents = p.text("cents")?;

            // Share below the absolute line
            t.push(
                Row::new()
                    .set("name", format!("Share below ${dollars} a day ({etext})"))
                    .set("slug", format!("headcount_ratio_{wslug}_{eslug}_{cents}"))
                    .set("description", format!(
                        "% of population living in households with {wtype} below ${dollars} a \
                         day.{NEW_LINE}This is {technical}. {subtitle}{NEW_LINE}{edesc}"
                    ))
                    .set("unit", "%")
                    .set("shortUnit", "%")
                    .set("type", "Numeric")
                    .set("colorScaleNumericBins", HEADCOUNT_BINS)
                    .set("colorScaleScheme", "OrRd")
                    .set("tableSlug", table_slug.as_str()),
            );

            // Number below the absolute line
            t.push(
                Row::new()
                    .set("name", format!("Number below ${dollars} a day ({etext})"))
                    .set("slug", format!("headcount_{wslug}_{eslug}_{cents}"))
                    .set("description", format!(
                        "Number of people living in households with {wtype} below ${dollars} a \
                         day.{NEW_LINE}This is {technical}. {subtitle}{NEW_LINE}{edesc}"
                    ))
                    .set_null("unit")
                    .set_null("shortUnit")
                    .set("type", "Numeric")
                    .set("colorScaleNumericBins", HEADCOUNT_ABS_BINS)
                    .set("colorScaleScheme", "Reds")
                    .set("tableSlug", table_slug.as_str()),
            );

            // Total shortfall from the absolute line
            t.push(
                Row::new()
                    .set("name", format!("${dollars} a day - total shortfall ({etext})"))
                    .set("slug", format!("total_shortfall_{wslug}_{eslug}_{cents}"))
                    .set("description", format!(
                        "The total shortfall from a poverty line of ${dollars} a day. This is \
                         the amount of money that would be theoretically needed to lift the \
                         {wtype} of all people in poverty up to the poverty line. However this \
                         is not a measure of the actual cost of eliminating poverty, since it \
                         does not take into account the costs involved in making the necessary \
                         transfers nor any changes in behaviour they would bring \
                         about.{NEW_LINE}This is {technical}. {subtitle}{NEW_LINE}{edesc}"
                    ))
                    .set("unit", "international-$ in 2017 prices")
                    .set("shortUnit", "$")
                    .set("type", "Numeric")
                    .set("colorScaleNumericBins", p.text("scale_total_shortfall")?)
                    .set("colorScaleScheme", "Oranges")
                    .set("tableSlug", table_slug.as_str()),
            );
        }

        for (wel, eq, pct) in cartesian3(welfare, scales, povlines_rel) {
            let wslug = wel.text("slug")?;
            let wtype = wel.text("welfare_type")?;
            let technical = wel.text("technical_text")?;
            let subtitle = wel.text("subtitle")?;
            let eslug = eq.text("slug")?;
            let etext = eq.text("text")?;
            let edesc = eq.text("description")?;
            let percent = pct.text("percent")?;
            let suffix = pct.text("slug_suffix")?;

            // Share below the relative line
            t.push(
                Row::new()
                    .set("name", format!(
                        "{percent} of median {wtype} - share of population below poverty line \
                         ({}, {etext})",
                        capitalize(&technical)
                    ))
                    .set("slug", format!("headcount_ratio_{suffix}_{wslug}_{eslug}"))
                    .set("description", format!(
                        "% of population living in households with {wtype} below {percent} of \
                         the median {wtype}.{NEW_LINE}This is {technical}. \
                         {subtitle}{NEW_LINE}{edesc}"
                    ))
                    .set("unit", "%")
                    .set("shortUnit", "%")
                    .set("type", "Numeric")
                    .set("colorScaleNumericBins", HEADCOUNT_REL_BINS)
                    .set("colorScaleScheme", "YlOrBr")
                    .set("tableSlug", table_slug.as_str()),
            );

            // Number below the relative line
            t.push(
                Row::new()
                    .set("name", format!(
                        "{percent} of median {wtype} - total number of people below poverty \
                         line ({}, {etext})",
                        capitalize(&technical)
                    ))
                    .set("slug", format!("headcount_{suffix}_{wslug}_{eslug}"))
                    .set("description", format!(
                        "Number of people living in households with {wtype} below {percent} of \
                         the median {wtype}.{NEW_LINE}This is {technical}. \
                         {subtitle}{NEW_LINE}{edesc}"
                    ))
                    .set_null("unit")
                    .set_null("shortUnit")
                    .set("type", "Numeric")
                    .set("colorScaleNumericBins", HEADCOUNT_ABS_BINS)
                    .set("colorScaleScheme", "YlOrBr")
                    .set("tableSlug", table_slug.as_str()),
            );
        }
    }

    t.set_constant("sourceName", Value::from(SOURCE_NAME));
    t.set_constant("dataPublishedBy", Value::from(DATA_PUBLISHED_BY));
    t.set_constant("sourceLink", Value::from(SOURCE_LINK));
    t.set_constant(
        "colorScaleNumericMinValue",
        Value::from(COLOR_SCALE_NUMERIC_MIN_VALUE),
    );
    t.set_constant("tolerance", Value::from(TOLERANCE));
    t.set_constant(
        "colorScaleEqualSizeBins",
        Value::from(COLOR_SCALE_EQUAL_SIZE_BINS),
    );
    t.cast_integer("tolerance")?;
    Ok(t)
}

fn grapher_views(
    welfare: &RefTable,
    scales: &RefTable,
    povlines_abs: &RefTable,
    povlines_rel: &RefTable,
    tables: &RefTable,
) -> Result<Table, PipelineError> {
    let mut g = Table::new();

    for tab in tables.rows() {
        let table_slug = tab.text("name")?;

        for (eq, wel) in cartesian2(scales, welfare) {
            let eslug = eq.text("slug")?;
            let etext = eq.text("text")?;
            let title = wel.text("title")?;
            let wslug = wel.text("slug")?;
            let wtype = wel.text("welfare_type")?;
            let subtitle = wel.text("subtitle")?;
            let dropdown = wel.text("dropdown_option")?;

            for p in povlines_abs.rows() {
                let dollars = p.text("dollars_text")?;
                let cents = p.text("cents")?;

                // Share in poverty at the absolute line
                g.push(
                    Row::new()
                        .set("title", format!(
                            "Share of population living below ${dollars} a day ({title})"
                        ))
                        .set("ySlugs", format!("headcount_ratio_{wslug}_{eslug}_{cents}"))
                        .set("Metric Dropdown", "Share in poverty")
                        .set("Poverty line Dropdown", format!("${dollars} per day"))
                        .set("Income measure Dropdown", dropdown.as_str())
                        .set("Equivalence scale Dropdown", etext.as_str())
                        .set("subtitle", format!(
                            "Share of population living in households with {wtype} below \
                             ${dollars} a day. {subtitle}"
                        ))
                        .set("note", PPP_NOTE)
                        .set_null("selectedFacetStrategy")
                        .set("hasMapTab", "true")
                        .set("tab", "map")
                        .set("tableSlug", table_slug.as_str()),
                );

                // Number in poverty at the absolute line
                g.push(
                    Row::new()
                        .set("title", format!(
                            "Number of people living below ${dollars} a day ({title})"
                        ))
                        .set("ySlugs", format!("headcount_{wslug}_{eslug}_{cents}"))
                        .set("Metric Dropdown", "Number in poverty")
                        .set("Poverty line Dropdown", format!("${dollars} per day"))
                        .set("Income measure Dropdown", dropdown.as_str())
                        .set("Equivalence scale Dropdown", etext.as_str())
                        .set("subtitle", format!(
                            "Number of people living in households with {wtype} below \
                             ${dollars} a day. {subtitle}"
                        ))
                        .set("note", PPP_NOTE)
                        .set_null("selectedFacetStrategy")
                        .set("hasMapTab", "true")
                        .set("tab", "map")
                        .set("tableSlug", table_slug.as_str()),
                );

                // Total shortfall from the absolute line
                g.push(
                    Row::new()
                        .set("title", format!(
                            "Total shortfall from a poverty line of ${dollars} a day ({title})"
                        ))
                        .set("ySlugs", format!("total_shortfall_{wslug}_{eslug}_{cents}"))
                        .set("Metric Dropdown", "Total shortfall from poverty line")
                        .set("Poverty line Dropdown", format!("${dollars} per day"))
                        .set("Income measure Dropdown", dropdown.as_str())
                        .set("Equivalence scale Dropdown", etext.as_str())
                        .set("subtitle", format!(
                            "This is the amount of money that would be theoretically needed to \
                             lift the {wtype} of all people in poverty up to ${dollars} a day. \
                             {subtitle}"
                        ))
                        .set("note", SHORTFALL_NOTE)
                        .set_null("selectedFacetStrategy")
                        .set("hasMapTab", "true")
                        .set("tab", "map")
                        .set("tableSlug", table_slug.as_str()),
                );
            }

            for pct in povlines_rel.rows() {
                let text = pct.text("text")?;
                let suffix = pct.text("slug_suffix")?;
                let line_dropdown = pct.text("dropdown")?;

                // Share in relative poverty
                g.push(
                    Row::new()
                        .set("title", format!(
                            "Share of population living below {text} {wtype} ({title})"
                        ))
                        .set("ySlugs", format!("headcount_ratio_{suffix}_{wslug}_{eslug}"))
                        .set("Metric Dropdown", "Share in poverty")
                        .set("Poverty line Dropdown", line_dropdown.as_str())
                        .set("Income measure Dropdown", dropdown.as_str())
                        .set("Equivalence scale Dropdown", etext.as_str())
                        .set("subtitle", format!(
                            "Relative poverty is measured in terms of a poverty line that rises \
                             and falls over time with average incomes, in this case set at \
                             {text} {wtype}. {subtitle}"
                        ))
                        .set_null("note")
                        .set_null("selectedFacetStrategy")
                        .set("hasMapTab", "true")
                        .set("tab", "map")
                        .set("tableSlug", table_slug.as_str()),
                );

                // Number in relative poverty
                g.push(
                    Row::new()
                        .set("title", format!(
                            "Number of people living below {text} {wtype} ({title})"
                        ))
                        .set("ySlugs", format!("headcount_{suffix}_{wslug}_{eslug}"))
                        .set("Metric Dropdown", "Number in poverty")
                        .set("Poverty line Dropdown", line_dropdown.as_str())
                        .set("Income measure Dropdown", dropdown.as_str())
                        .set("Equivalence scale Dropdown", etext.as_str())
                        .set("subtitle", format!(
                            "Relative poverty is measured in terms of a poverty line that rises \
                             and falls over time with average incomes, in this case set at \
                             {text} {wtype}. {subtitle}"
                        ))
                        .set_null("note")
                        .set_null("selectedFacetStrategy")
                        .set("hasMapTab", "true")
                        .set("tab", "map")
                        .set("tableSlug", table_slug.as_str()),
                );
            }
        }
    }

    Ok(g)
}
