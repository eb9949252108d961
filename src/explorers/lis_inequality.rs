//! Inequality Data Explorer of the Luxembourg Income Study.
//!
//! Reference sheets: `welfare` (income concepts before/after tax),
//! `equivalence_scales` (household cost-sharing adjustment) and `tables`
//! (the LIS dataset each block of variables belongs to). The welfare ×
//! equivalence-scale product is expanded into five indicators per
//! combination (Gini, richest-10% share, poorest-50% share, Palma ratio,
//! relative poverty), plus after-tax-vs-before-tax comparison views per
//! equivalence scale.

use serde_json::Value;

use super::capitalize;
use crate::error::PipelineError;
use crate::grid::{cartesian2, Row, Table};
use crate::sheets::{self, ReadOptions, RefTable, SheetRef};
use crate::tsv::Explorer;

pub const SLUG: &str = "lis-inequality";

const SHEET_ID: &str = "1UFdwB1iBpP2tEP6GtxCHvW1GGhjsFflh42FWR80rYIg";

const SOURCE_NAME: &str = "Luxembourg Income Study (2023)";
const DATA_PUBLISHED_BY: &str = "Luxembourg Income Study (LIS) Database, http://www.lisdatacenter.org (multiple countries; 1967-2020). Luxembourg, LIS.";
const SOURCE_LINK: &str = "https://www.lisdatacenter.org/our-data/lis-database/";
const COLOR_SCALE_NUMERIC_MIN_VALUE: i64 = 0;
const TOLERANCE: i64 = 5;
const COLOR_SCALE_EQUAL_SIZE_BINS: &str = "true";
const Y_AXIS_MIN: i64 = 0;
const MAP_TARGET_TIME: i64 = 2019;

// Explorer text fields use literal <br> breaks, not newlines.
const NEW_LINE: &str = "<br><br>";

const EQUIVALIZED_CHECKBOX: &str =
    "Adjust for cost sharing within households (equivalized income) Checkbox";

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
        &ReadOptions::default().string_column("checkbox"),
    )
    .await?;
    let tables = sheets::fetch(
        client,
        &SheetRef::new(SHEET_ID, "tables"),
        &ReadOptions::default(),
    )
    .await?;
    assemble(&welfare, &scales, &tables)
}

/// Assemble the explorer from already-loaded reference tables.
pub fn assemble(
    welfare: &RefTable,
    scales: &RefTable,
    tables: &RefTable,
) -> Result<Explorer, PipelineError> {
    let mut explorer = Explorer::new();
    push_header(&mut explorer);

    let columns = column_definitions(welfare, scales, tables)?;
    let mut graphers = grapher_views(welfare, scales, tables)?;

    graphers.set_constant("relatedQuestionText", Value::Null);
    graphers.set_constant("relatedQuestionUrl", Value::Null);
    graphers.set_constant("yAxisMin", Value::from(Y_AXIS_MIN));
    graphers.set_constant("mapTargetTime", Value::from(MAP_TARGET_TIME));
    // keep the platform parameter integral
    graphers.cast_integer("mapTargetTime")?;
    graphers.mark_default_view(&[
        ("Indicator Dropdown", "Gini coefficient"),
        ("Income measure Dropdown", "After tax"),
        (EQUIVALIZED_CHECKBOX, "false"),
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
        "Inequality Data Explorer of the Luxembourg Income Study",
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
        "gini_mi_eq share_p100_mi_eq palma_ratio_mi_eq headcount_ratio_50_median_mi_eq \
         gini_dhi_eq share_p100_dhi_eq palma_ratio_dhi_eq headcount_ratio_50_median_dhi_eq",
    );
}

/// One variable definition per indicator × welfare × equivalence scale, per
/// LIS dataset, preceded by the entity/year columns every dataset carries.
fn column_definitions(
    welfare: &RefTable,
    scales: &RefTable,
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

        for (wel, eq) in cartesian2(welfare, scales) {
            let title = wel.text("title")?;
            let wslug = wel.text("slug")?;
            let wtype = wel.text("welfare_type")?;
            let technical = wel.text("technical_text")?;
            let subtitle = wel.text("subtitle")?;
            let eslug = eq.text("slug")?;
            let edesc = eq.text("description")?;

            // Gini coefficient
            t.push(
                Row::new()
                    .set("name", format!("Gini coefficient ({title})"))
                    .set("slug", format!("gini_{wslug}_{eslug}"))
                    .set("description", format!(
                        "The Gini coefficient is a measure of the inequality of the {wtype} \
                         distribution in a population. Higher values indicate a higher level of \
                         inequality.{NEW_LINE}This is {technical}. {subtitle}{NEW_LINE}{edesc}"
                    ))
                    .set_null("unit")
                    .set_null("shortUnit")
                    .set("type", "Numeric")
                    .set("colorScaleNumericBins", wel.text("scale_gini")?)
                    .set("colorScaleScheme", "Oranges")
                    .set("tableSlug", table_slug.as_str()),
            );

            // Share of the richest 10%
            t.push(
                Row::new()
                    .set("name", format!(
                        "{} share of the richest 10% ({title})",
                        capitalize(&wtype)
                    ))
                    .set("slug", format!("share_p100_{wslug}_{eslug}"))
                    .set("description", format!(
                        "This is the {wtype} of the richest 10% as a share of total \
                         {wtype}.{NEW_LINE}This is {technical}. {subtitle}{NEW_LINE}{edesc}"
                    ))
                    .set("unit", "%")
                    .set("shortUnit", "%")
                    .set("type", "Numeric")
                    .set("colorScaleNumericBins", wel.text("scale_top10")?)
                    .set("colorScaleScheme", "OrRd")
                    .set("tableSlug", table_slug.as_str()),
            );

            // Share of the poorest 50%
            t.push(
                Row::new()
                    .set("name", format!(
                        "{} share of the poorest 50% ({title})",
                        capitalize(&wtype)
                    ))
                    .set("slug", format!("share_bottom50_{wslug}_{eslug}"))
                    .set("description", format!(
                        "This is the {wtype} of the poorest 50% as a share of total \
                         {wtype}.{NEW_LINE}This is {technical}. {subtitle}{NEW_LINE}{edesc}"
                    ))
                    .set("unit", "%")
                    .set("shortUnit", "%")
                    .set("type", "Numeric")
                    .set("colorScaleNumericBins", wel.text("scale_bottom50")?)
                    .set("colorScaleScheme", "Blues")
                    .set("tableSlug", table_slug.as_str()),
            );

            // Palma ratio
            t.push(
                Row::new()
                    .set("name", format!("Palma ratio ({title})"))
                    .set("slug", format!("palma_ratio_{wslug}_{eslug}"))
                    .set("description", format!(
                        "The Palma ratio is a measure of inequality: it is the share of total \
                         {wtype} of the top 10% divided by the share of the bottom \
                         40%.{NEW_LINE}This is {technical}. {subtitle}{NEW_LINE}{edesc}"
                    ))
                    .set_null("unit")
                    .set_null("shortUnit")
                    .set("type", "Numeric")
                    .set("colorScaleNumericBins", wel.text("scale_palma_ratio")?)
                    .set("colorScaleScheme", "YlOrBr")
                    .set("tableSlug", table_slug.as_str()),
            );

            // Share in relative poverty
            t.push(
                Row::new()
                    .set("name", format!("Share in relative poverty ({title})"))
                    .set("slug", format!("headcount_ratio_50_median_{wslug}_{eslug}"))
                    .set("description", format!(
                        "% of population living in households with {wtype} below 50% of the \
                         median {wtype}.{NEW_LINE}This is {technical}. \
                         {subtitle}{NEW_LINE}{edesc}"
                    ))
                    .set("unit", "%")
                    .set("shortUnit", "%")
                    .set("type", "Numeric")
                    .set("colorScaleNumericBins", wel.text("scale_relative_poverty")?)
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

/// One chart view per indicator × equivalence scale × welfare, followed by
/// after-tax-vs-before-tax comparison views per equivalence scale.
fn grapher_views(
    welfare: &RefTable,
    scales: &RefTable,
    tables: &RefTable,
) -> Result<Table, PipelineError> {
    let mut g = Table::new();

    for tab in tables.rows() {
        let table_slug = tab.text("name")?;

        for eq in scales.rows() {
            let eslug = eq.text("slug")?;
            let checkbox = eq.text("checkbox")?;
            let note = eq.text("note")?;

            for wel in welfare.rows() {
                let title = wel.text("title")?;
                let wslug = wel.text("slug")?;
                let wtype = wel.text("welfare_type")?;
                let subtitle = wel.text("subtitle")?;
                let dropdown = wel.text("dropdown_option")?;

                // Gini coefficient
                g.push(
                    Row::new()
                        .set("title", format!("Gini coefficient ({title})"))
                        .set("ySlugs", format!("gini_{wslug}_{eslug}"))
                        .set("Indicator Dropdown", "Gini coefficient")
                        .set("Income measure Dropdown", dropdown.as_str())
                        .set(EQUIVALIZED_CHECKBOX, checkbox.as_str())
                        .set("subtitle", format!(
                            "The Gini coefficient is a measure of the inequality of the {wtype} \
                             distribution in a population. Higher values indicate a higher level \
                             of inequality. {subtitle}"
                        ))
                        .set("note", note.as_str())
                        .set_null("selectedFacetStrategy")
                        .set("hasMapTab", "true")
                        .set("tab", "map")
                        .set("tableSlug", table_slug.as_str()),
                );

                // Share of the richest 10%
                g.push(
                    Row::new()
                        .set("title", format!(
                            "{} share of the richest 10% ({title})",
                            capitalize(&wtype)
                        ))
                        .set("ySlugs", format!("share_p100_{wslug}_{eslug}"))
                        .set("Indicator Dropdown", "Share of the richest 10%")
                        .set("Income measure Dropdown", dropdown.as_str())
                        .set(EQUIVALIZED_CHECKBOX, checkbox.as_str())
                        .set("subtitle", format!(
                            "The share of {wtype} received by the richest 10% of the population. \
                             {subtitle}"
                        ))
                        .set("note", note.as_str())
                        .set_null("selectedFacetStrategy")
                        .set("hasMapTab", "true")
                        .set("tab", "map")
                        .set("tableSlug", table_slug.as_str()),
                );

                // Share of the poorest 50%
                g.push(
                    Row::new()
                        .set("title", format!(
                            "{} share of the poorest 50% ({title})",
                            capitalize(&wtype)
                        ))
                        .set("ySlugs", format!("share_bottom50_{wslug}_{eslug}"))
                        .set("Indicator Dropdown", "Share of the poorest 50%")
                        .set("Income measure Dropdown", dropdown.as_str())
                        .set(EQUIVALIZED_CHECKBOX, checkbox.as_str())
                        .set("subtitle", format!(
                            "The share of {wtype} received by the poorest 50% of the population. \
                             {subtitle}"
                        ))
                        .set("note", note.as_str())
                        .set_null("selectedFacetStrategy")
                        .set("hasMapTab", "true")
                        .set("tab", "map")
                        .set("tableSlug", table_slug.as_str()),
                );

                // Palma ratio
                g.push(
                    Row::new()
                        .set("title", format!("Palma ratio ({title})"))
                        .set("ySlugs", format!("palma_ratio_{wslug}_{eslug}"))
                        .set("Indicator Dropdown", "Palma ratio")
                        .set("Income measure Dropdown", dropdown.as_str())
                        .set(EQUIVALIZED_CHECKBOX, checkbox.as_str())
                        .set("subtitle", format!(
                            "The share of {wtype} of the richest 10% divided by the share of the \
                             poorest 40%. {subtitle}"
                        ))
                        .set("note", note.as_str())
                        .set_null("selectedFacetStrategy")
                        .set("hasMapTab", "true")
                        .set("tab", "map")
                        .set("tableSlug", table_slug.as_str()),
                );

                // Share in relative poverty
                g.push(
                    Row::new()
                        .set("title", format!("Share in relative poverty ({title})"))
                        .set("ySlugs", format!("headcount_ratio_50_median_{wslug}_{eslug}"))
                        .set("Indicator Dropdown", "Share in relative poverty")
                        .set("Income measure Dropdown", dropdown.as_str())
                        .set(EQUIVALIZED_CHECKBOX, checkbox.as_str())
                        .set("subtitle", format!(
                            "The share of the population with {wtype} below 50% of the median. \
                             Relative poverty is a measure of the extent of inequality within \
                             the bottom of the distribution. {subtitle}"
                        ))
                        .set("note", note.as_str())
                        .set_null("type")
                        .set_null("selectedFacetStrategy")
                        .set("hasMapTab", "true")
                        .set("tab", "map")
                        .set("tableSlug", table_slug.as_str()),
                );
            }

            // After tax vs. before tax comparisons; welfare slugs are fixed
            // here (mi = market income, dhi = disposable household income).
            g.push(
                Row::new()
                    .set("title", "Gini coefficient (after tax vs. before tax)")
                    .set("ySlugs", format!("gini_mi_{eslug} gini_dhi_{eslug}"))
                    .set("Indicator Dropdown", "Gini coefficient")
                    .set("Income measure Dropdown", "After tax vs. before tax")
                    .set(EQUIVALIZED_CHECKBOX, checkbox.as_str())
                    .set("subtitle",
                        "The Gini coefficient is a measure of the inequality of the income \
                         distribution in a population. Higher values indicate a higher level of \
                         inequality.")
                    .set("note", note.as_str())
                    .set("selectedFacetStrategy", "entity")
                    .set("hasMapTab", "false")
                    .set("tab", "chart")
                    .set("tableSlug", table_slug.as_str()),
            );
            g.push(
                Row::new()
                    .set("title", "Income share of the richest 10% (after tax vs. before tax)")
                    .set("ySlugs", format!("share_p100_mi_{eslug} share_p100_dhi_{eslug}"))
                    .set("Indicator Dropdown", "Share of the richest 10%")
                    .set("Income measure Dropdown", "After tax vs. before tax")
                    .set(EQUIVALIZED_CHECKBOX, checkbox.as_str())
                    .set("subtitle",
                        "The share of income received by the richest 10% of the population.")
                    .set("note", note.as_str())
                    .set("selectedFacetStrategy", "entity")
                    .set("hasMapTab", "false")
                    .set("tab", "chart")
                    .set("tableSlug", table_slug.as_str()),
            );
            g.push(
                Row::new()
                    .set("title", "Income share of the poorest 50% (after tax vs. before tax)")
                    .set("ySlugs", format!(
                        "share_bottom50_mi_{eslug} share_bottom50_dhi_{eslug}"
                    ))
                    .set("Indicator Dropdown", "Share of the poorest 50%")
                    .set("Income measure Dropdown", "After tax vs. before tax")
                    .set(EQUIVALIZED_CHECKBOX, checkbox.as_str())
                    .set("subtitle",
                        "The share of income received by the poorest 50% of the population.")
                    .set("note", note.as_str())
                    .set("selectedFacetStrategy", "entity")
                    .set("hasMapTab", "false")
                    .set("tab", "chart")
                    .set("tableSlug", table_slug.as_str()),
            );
            g.push(
                Row::new()
                    .set("title", "Palma ratio (after tax vs. before tax)")
                    .set("ySlugs", format!("palma_ratio_mi_{eslug} palma_ratio_dhi_{eslug}"))
                    .set("Indicator Dropdown", "Palma ratio")
                    .set("Income measure Dropdown", "After tax vs. before tax")
                    .set(EQUIVALIZED_CHECKBOX, checkbox.as_str())
                    .set("subtitle",
                        "The share of income of the richest 10% divided by the share of the \
                         poorest 40%.")
                    .set("note", note.as_str())
                    .set("selectedFacetStrategy", "entity")
                    .set("hasMapTab", "false")
                    .set("tab", "chart")
                    .set("tableSlug", table_slug.as_str()),
            );
            g.push(
                Row::new()
                    .set("title", "Share in relative poverty (after tax vs. before tax)")
                    .set("ySlugs", format!(
                        "headcount_ratio_50_median_mi_{eslug} headcount_ratio_50_median_dhi_{eslug}"
                    ))
                    .set("Indicator Dropdown", "Share in relative poverty")
                    .set("Income measure Dropdown", "After tax vs. before tax")
                    .set(EQUIVALIZED_CHECKBOX, checkbox.as_str())
                    .set("subtitle",
                        "The share of the population with income below 50% of the median. \
                         Relative poverty is a measure of the extent of inequality within the \
                         bottom of the distribution.")
                    .set("note", note.as_str())
                    .set_null("type")
                    .set("selectedFacetStrategy", "entity")
                    .set("hasMapTab", "false")
                    .set("tab", "chart")
                    .set("tableSlug", table_slug.as_str()),
            );
        }
    }

    Ok(g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::parse_csv_str;

    fn welfare() -> RefTable {
        let csv = "\
title,slug,welfare_type,technical_text,subtitle,dropdown_option,scale_gini,scale_top10,scale_bottom50,scale_palma_ratio,scale_relative_poverty
Income before tax,mi,income,income before taxes and benefits,This is market income.,Before tax,0.3;0.4;0.5,20;30;40,10;20;30,1;2;4,10;15;20
Income after tax,dhi,income,income after taxes and benefits,This is disposable income.,After tax,0.3;0.4;0.5,20;30;40,10;20;30,1;2;4,10;15;20
";
        parse_csv_str("welfare", csv, &ReadOptions::default()).unwrap()
    }

    fn scales() -> RefTable {
        let csv = "\
slug,text,checkbox,note,description
eq,Equivalized,false,Income is equivalized.,Income has been equivalized.
";
        parse_csv_str(
            "equivalence_scales",
            csv,
            &ReadOptions::default().string_column("checkbox"),
        )
        .unwrap()
    }

    fn tables() -> RefTable {
        let csv = "\
name,link
lis_data,https://example.org/lis_data.csv
";
        parse_csv_str("tables", csv, &ReadOptions::default()).unwrap()
    }

    #[test]
    fn test_grapher_view_count() {
        let explorer = assemble(&welfare(), &scales(), &tables()).unwrap();
        // 1 table × 1 scale × (2 welfare × 5 indicators + 5 comparisons)
        assert_eq!(explorer.graphers().len(), 15);
    }

    #[test]
    fn test_column_definition_count() {
        let explorer = assemble(&welfare(), &scales(), &tables()).unwrap();
        let block = &explorer.tables()[0];
        // country + year + 2 welfare × 1 scale × 5 indicators
        assert_eq!(block.columns.len(), 12);
        assert_eq!(block.slug, "lis_data");
        assert_eq!(block.url, "https://example.org/lis_data.csv");
    }

    #[test]
    fn test_grapher_column_order() {
        let explorer = assemble(&welfare(), &scales(), &tables()).unwrap();
        assert_eq!(
            explorer.graphers().columns(),
            &[
                "title",
                "ySlugs",
                "Indicator Dropdown",
                "Income measure Dropdown",
                EQUIVALIZED_CHECKBOX,
                "subtitle",
                "note",
                "selectedFacetStrategy",
                "hasMapTab",
                "tab",
                "tableSlug",
                "type",
                "relatedQuestionText",
                "relatedQuestionUrl",
                "yAxisMin",
                "mapTargetTime",
                "defaultView",
            ]
        );
    }

    #[test]
    fn test_default_view_is_after_tax_gini() {
        let explorer = assemble(&welfare(), &scales(), &tables()).unwrap();
        let g = explorer.graphers();
        let flagged: Vec<usize> = (0..g.len())
            .filter(|&i| g.text(i, "defaultView") == "true")
            .collect();
        assert_eq!(flagged.len(), 1);
        let i = flagged[0];
        assert_eq!(g.text(i, "Indicator Dropdown"), "Gini coefficient");
        assert_eq!(g.text(i, "Income measure Dropdown"), "After tax");
    }

    #[test]
    fn test_first_rows_are_gini_in_welfare_order() {
        let explorer = assemble(&welfare(), &scales(), &tables()).unwrap();
        let g = explorer.graphers();
        assert_eq!(g.text(0, "title"), "Gini coefficient (Income before tax)");
        assert_eq!(g.text(0, "ySlugs"), "gini_mi_eq");
        assert_eq!(g.text(5, "title"), "Gini coefficient (Income after tax)");
        assert_eq!(g.text(5, "ySlugs"), "gini_dhi_eq");
    }

    #[test]
    fn test_every_indicator_column_has_a_view() {
        let explorer = assemble(&welfare(), &scales(), &tables()).unwrap();
        let g = explorer.graphers();
        let referenced: std::collections::HashSet<String> = (0..g.len())
            .flat_map(|i| {
                g.text(i, "ySlugs")
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        for block in explorer.tables() {
            for i in 0..block.columns.len() {
                if block.columns.text(i, "type") != "Numeric" {
                    continue;
                }
                let slug = block.columns.text(i, "slug");
                assert!(
                    referenced.contains(&slug),
                    "no grapher view references column '{slug}'"
                );
            }
        }
    }

    #[test]
    fn test_table_constants_applied() {
        let explorer = assemble(&welfare(), &scales(), &tables()).unwrap();
        let block = &explorer.tables()[0];
        assert_eq!(block.columns.text(0, "sourceName"), SOURCE_NAME);
        assert_eq!(block.columns.text(3, "tolerance"), "5");
        assert_eq!(block.columns.text(3, "colorScaleEqualSizeBins"), "true");
        // the grouping column does not leak into the block
        assert!(!block.columns.columns().contains(&"tableSlug".to_string()));
    }

    #[test]
    fn test_descriptions_join_with_break_tags() {
        let explorer = assemble(&welfare(), &scales(), &tables()).unwrap();
        let block = &explorer.tables()[0];
        let desc = block.columns.text(2, "description");
        assert!(desc.starts_with("The Gini coefficient"));
        assert!(desc.contains("<br><br>This is income before taxes and benefits."));
        assert!(desc.ends_with("Income has been equivalized."));
    }

    #[test]
    fn test_render_full_explorer() {
        let explorer = assemble(&welfare(), &scales(), &tables()).unwrap();
        let text = explorer.render().unwrap();
        assert!(text.starts_with(
            "explorerTitle\tInequality Data Explorer of the Luxembourg Income Study\n"
        ));
        assert!(text.contains("\ngraphers\n"));
        assert!(text.contains("\ntable\thttps://example.org/lis_data.csv\tlis_data\n"));
        assert!(text.contains("columns\tlis_data\n"));
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let a = assemble(&welfare(), &scales(), &tables()).unwrap();
        let b = assemble(&welfare(), &scales(), &tables()).unwrap();
        assert_eq!(a.render().unwrap(), b.render().unwrap());
    }
}
