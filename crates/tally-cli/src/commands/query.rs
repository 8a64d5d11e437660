//! Query command handler

use anyhow::Result;

use tally_core::SearchQuery;

use crate::output::Output;

/// Show how search text breaks down into phrases and words
pub fn parse(text: String, output: &Output) -> Result<()> {
    output.print_query(&SearchQuery::parse(&text));
    Ok(())
}
