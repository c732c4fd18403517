use letterbox_core::update::{count_failures, FileResult};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").trim_end());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

/// Print a batch result list, then fail if any file failed.
pub fn report_results(title: &str, results: &[FileResult], json: bool) -> anyhow::Result<()> {
    let failures = count_failures(results);

    if json {
        print_json(&serde_json::json!({
            "operation": title,
            "results": results,
            "failed": failures,
        }))?;
    } else if results.is_empty() {
        println!("{title}: no matching files.");
    } else {
        let rows = results
            .iter()
            .map(|r| {
                vec![
                    r.file.clone(),
                    r.target.clone(),
                    r.outcome.label().to_string(),
                    r.outcome.detail(),
                ]
            })
            .collect();
        print_table(&["FILE", "TARGET", "STATUS", "DETAIL"], rows);
        if failures == 0 {
            println!("\n{title} complete.");
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} files failed", results.len());
    }
    Ok(())
}
