//! Prompt assembly for the rerank call.

use crate::types::CatalogItem;

/// Role instruction sent with every rerank request.
pub const STYLIST_SYSTEM_PROMPT: &str = "\
You are a helpful fashion stylist.

You are the re-ranking and explanation engine of a two-stage recommendation pipeline. \
A keyword search has already retrieved candidate items from the inventory.

Instructions:
1. Ranking: re-rank the candidate items by how well they fit the nuance of the user's vibe or occasion.
2. Explanation: for each pick, explain why its visual features match the query. \
Do not give generic responses like \"This is a nice shirt\".";

/// Formats candidates one per line as `id | name | category | description`.
pub fn format_candidates(candidates: &[&CatalogItem]) -> String {
  candidates
    .iter()
    .map(|item| {
      format!(
        "{} | {} | {} | {}",
        single_line(&item.id),
        single_line(&item.name),
        single_line(&item.category),
        single_line(&item.description)
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

/// Builds the task prompt for `query` over the formatted candidates.
pub fn build_prompt(query: &str, candidates: &[&CatalogItem], pick_count: usize) -> String {
  format!(
    "User Query: \"{query}\"\n\
     \n\
     Top Candidates Found in Inventory (id | name | category | description):\n\
     {block}\n\
     \n\
     ---\n\
     Your Task:\n\
     1. Select EXACTLY {pick_count} items from the list above that match the user's query.\n\
     2. If there are fewer than {pick_count} perfect matches, include the next best relevant items to reach {pick_count}.\n\
     3. If the query names an item type (e.g. \"Shoes\"), ONLY select items that are actually that type.\n\
     4. Use the item ids exactly as listed.\n\
     5. Generate a natural language explanation for each pick.\n\
     \n\
     Output JSON with the fields user_query, stylist_summary and recommendations \
     (each with rank, item_id, description, explanation).",
    block = format_candidates(candidates),
  )
}

// Keeps one candidate per line and the column separator unambiguous.
fn single_line(text: &str) -> String {
  text
    .split(|c: char| c == '\n' || c == '\r' || c == '|')
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}
