//! Dashboard handler: the console page with query and manage forms.

use axum::{extract::State, response::Html};
use srb_engine::present::escape_html;
use srb_engine::selectors::{SelectOption, Selectors};

use crate::state::SharedState;

pub async fn dashboard(State(state): State<SharedState>) -> Html<String> {
    let selectors = state.console.selectors().await;
    Html(render_dashboard(&selectors))
}

fn options_html(options: &[SelectOption]) -> String {
    options
        .iter()
        .map(|o| {
            let value = o.value.map(|v| v.to_string()).unwrap_or_default();
            format!(r#"<option value="{}">{}</option>"#, value, escape_html(&o.label))
        })
        .collect()
}

fn render_dashboard(selectors: &Selectors) -> String {
    let countries = options_html(&selectors.countries);
    let sub_regions = options_html(&selectors.sub_regions);
    let regions = options_html(&selectors.regions);
    let years = options_html(&selectors.years);

    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>SRB Console</title>
</head>
<body>
<main class="main-content">
    <h1 class="page-title">Sex Ratio at Birth</h1>

    <section id="view-query">
        <form method="GET" action="/query/country">
            <h2>1. Country time series</h2>
            <select name="country_id">{countries}</select>
            <button type="submit">Run</button>
        </form>

        <form method="GET" action="/query/subregion">
            <h2>2. Sub-region ranking</h2>
            <select name="sub_region_id">{sub_regions}</select>
            <select name="year">{years}</select>
            <button type="submit">Run</button>
        </form>

        <form method="GET" action="/query/region">
            <h2>3. Region maximum by sub-region</h2>
            <select name="region_id">{regions}</select>
            <select name="year">{years}</select>
            <button type="submit">Run</button>
        </form>

        <form method="GET" action="/query/search">
            <h2>4. Latest value by country name</h2>
            <input type="text" name="keyword" placeholder="keyword">
            <button type="submit">Search</button>
        </form>
    </section>

    <section id="view-manage">
        <form method="POST" action="/manage/add">
            <h2>5. Add next year</h2>
            <select name="country_id" id="add-country">{countries}</select>
            <span class="hint">Latest year: <span id="add-latest-year">--</span></span>
            <input type="number" step="any" name="value" placeholder="SRB value">
            <button type="submit">Add</button>
        </form>

        <form method="POST" action="/manage/update">
            <h2>6. Update a year</h2>
            <select name="country_id" id="update-country">{countries}</select>
            <select name="year" id="update-year"><option value="">Select</option></select>
            <input type="number" step="any" name="value" placeholder="SRB value">
            <button type="submit">Update</button>
        </form>

        <form method="POST" action="/manage/delete">
            <h2>7. Delete a year range</h2>
            <select name="country_id">{countries}</select>
            <input type="number" name="start_year" placeholder="from">
            <input type="number" name="end_year" placeholder="to">
            <button type="submit">Delete</button>
        </form>
    </section>
</main>
<script>
    async function getJson(url) {{
        const resp = await fetch(url);
        return resp.ok ? resp.json() : null;
    }}

    document.getElementById('add-country').addEventListener('change', async function() {{
        const label = document.getElementById('add-latest-year');
        if (!this.value) {{ label.textContent = '--'; return; }}
        const latest = await getJson('/manage/latest-year?country_id=' + this.value);
        label.textContent = latest ? latest.label : '--';
    }});

    document.getElementById('update-country').addEventListener('change', async function() {{
        const select = document.getElementById('update-year');
        const options = this.value ? await getJson('/manage/years?country_id=' + this.value) : null;
        select.innerHTML = '';
        for (const o of (options || [{{ value: null, label: 'Select' }}])) {{
            const opt = document.createElement('option');
            opt.value = o.value === null ? '' : o.value;
            opt.textContent = o.label;
            select.appendChild(opt);
        }}
    }});
</script>
</body>
</html>"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use srb_engine::testing::sample_dataset;

    #[test]
    fn test_dashboard_lists_every_selector() {
        let html = render_dashboard(&Selectors::build(&sample_dataset()));
        assert!(html.contains(r#"<option value="">-- Select --</option>"#));
        assert!(html.contains(r#"<option value="7">Westmark</option>"#));
        assert!(html.contains(r#"<option value="2022">2022</option>"#));
        assert!(html.contains(r#"<option value="11">Southern Asia</option>"#));
    }

    #[test]
    fn test_manage_forms_fetch_latest_year_and_year_options() {
        let html = render_dashboard(&Selectors::build(&sample_dataset()));
        assert!(html.contains(r#"<span id="add-latest-year">--</span>"#));
        assert!(html.contains(r#"<select name="year" id="update-year"><option value="">Select</option></select>"#));
        assert!(html.contains("fetch(url)"));
        assert!(html.contains("'/manage/latest-year?country_id=' + this.value"));
        assert!(html.contains("'/manage/years?country_id=' + this.value"));
        assert!(!html.contains(r#"<input type="number" name="year""#));
    }
}
