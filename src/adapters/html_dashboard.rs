//! HTML dashboard page: three rendered charts plus title and summary.
//!
//! Generated with an Askama template; chart markup comes from any
//! [`ChartRenderer`].

use std::fs;
use std::path::Path;

use crate::domain::dashboard::DashboardOutput;
use crate::domain::error::DashboardError;
use crate::ports::chart_port::ChartRenderer;

use askama::Template;

pub const PAGE_TITLE: &str = "BIST 100 Stock Dashboard";

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    page_title: &'a str,
    theme: &'a str,
    period_label: &'a str,
    compare_text: String,
    title_text: &'a str,
    summary_text: &'a str,
    price_svg: String,
    rsi_svg: String,
    macd_svg: String,
}

pub struct HtmlDashboardWriter<R: ChartRenderer> {
    renderer: R,
}

impl<R: ChartRenderer> HtmlDashboardWriter<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn render(&self, output: &DashboardOutput) -> Result<String, DashboardError> {
        let params = &output.parameters;
        let template = DashboardTemplate {
            page_title: PAGE_TITLE,
            theme: params.theme.as_str(),
            period_label: params.lookback.label(),
            compare_text: params
                .secondary
                .as_ref()
                .map(|t| t.to_string())
                .unwrap_or_default(),
            title_text: &output.title_text,
            summary_text: &output.summary_text,
            price_svg: self.renderer.render(&output.price_view),
            rsi_svg: self.renderer.render(&output.rsi_view),
            macd_svg: self.renderer.render(&output.macd_view),
        };

        template.render().map_err(|e| DashboardError::Render {
            reason: e.to_string(),
        })
    }

    pub fn write(&self, output: &DashboardOutput, path: &Path) -> Result<(), DashboardError> {
        let html = self.render(output)?;
        fs::write(path, html)?;
        log::info!("wrote dashboard to {}", path.display());
        Ok(())
    }
}
