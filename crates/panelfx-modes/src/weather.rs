#![forbid(unsafe_code)]

//! Weather display.
//!
//! Shows the cached report: location on top, temperature and humidity on
//! the left, a condition icon on the right, and up to five forecast days
//! along the bottom. Without a report it shows the status placeholder.

use panelfx_core::{WeatherCondition, WeatherReport};
use panelfx_render::{Draw, PixelBuffer, Rgb};

use crate::{Generator, RenderContext, draw_centered};

/// Icon box edge in pixels.
pub const ICON_SIZE: i32 = 12;

const LABEL: Rgb = Rgb::new(160, 160, 160);
const SUN: Rgb = Rgb::new(255, 200, 0);
const CLOUD: Rgb = Rgb::new(150, 150, 170);
const RAIN: Rgb = Rgb::new(40, 120, 255);
const FOG: Rgb = Rgb::new(110, 110, 110);

/// Accent color for a condition.
pub fn condition_color(condition: WeatherCondition) -> Rgb {
    match condition {
        WeatherCondition::Clear => SUN,
        WeatherCondition::Clouds => CLOUD,
        WeatherCondition::Rain => RAIN,
        WeatherCondition::Snow => Rgb::WHITE,
        WeatherCondition::Storm => Rgb::new(255, 255, 0),
        WeatherCondition::Fog => FOG,
    }
}

fn draw_cloud(buf: &mut PixelBuffer, x: i32, y: i32) {
    buf.draw_circle(x + 4, y + 4, 2, CLOUD);
    buf.draw_circle(x + 7, y + 3, 3, CLOUD);
    buf.fill_rect(x + 2, y + 5, 8, 2, CLOUD);
}

/// Draw a condition icon in the `ICON_SIZE` box at `(x, y)`.
pub fn draw_icon(buf: &mut PixelBuffer, condition: WeatherCondition, x: i32, y: i32) {
    let c = ICON_SIZE / 2;
    match condition {
        WeatherCondition::Clear => {
            buf.draw_circle(x + c, y + c, 2, SUN);
            buf.fill_rect(x + c - 1, y + c - 1, 3, 3, SUN);
            buf.draw_vline(x + c, y, 2, SUN);
            buf.draw_vline(x + c, y + ICON_SIZE - 2, 2, SUN);
            buf.draw_hline(x, y + c, 2, SUN);
            buf.draw_hline(x + ICON_SIZE - 2, y + c, 2, SUN);
            buf.draw_line(x + 2, y + 2, x + 3, y + 3, SUN);
            buf.draw_line(x + ICON_SIZE - 3, y + 2, x + ICON_SIZE - 4, y + 3, SUN);
            buf.draw_line(x + 2, y + ICON_SIZE - 3, x + 3, y + ICON_SIZE - 4, SUN);
            buf.draw_line(
                x + ICON_SIZE - 3,
                y + ICON_SIZE - 3,
                x + ICON_SIZE - 4,
                y + ICON_SIZE - 4,
                SUN,
            );
        }
        WeatherCondition::Clouds => {
            draw_cloud(buf, x, y + 2);
        }
        WeatherCondition::Rain => {
            draw_cloud(buf, x, y);
            for dx in [3, 6, 9] {
                buf.draw_line(x + dx, y + 8, x + dx - 1, y + 11, RAIN);
            }
        }
        WeatherCondition::Snow => {
            draw_cloud(buf, x, y);
            for (dx, dy) in [(3, 9), (6, 11), (9, 9)] {
                buf.set_pixel(x + dx, y + dy, Rgb::WHITE);
            }
        }
        WeatherCondition::Storm => {
            draw_cloud(buf, x, y);
            let bolt = condition_color(WeatherCondition::Storm);
            buf.draw_line(x + 7, y + 7, x + 5, y + 9, bolt);
            buf.draw_line(x + 5, y + 9, x + 7, y + 9, bolt);
            buf.draw_line(x + 7, y + 9, x + 5, y + 11, bolt);
        }
        WeatherCondition::Fog => {
            for dy in [3, 6, 9] {
                buf.draw_hline(x + 1, y + dy, ICON_SIZE - 2, FOG);
            }
        }
    }
}

/// Weather display mode. Stateless; the report comes from the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherMode;

impl WeatherMode {
    pub fn new() -> Self {
        Self
    }

    fn draw_report(ctx: &RenderContext<'_>, report: &WeatherReport, buf: &mut PixelBuffer) {
        let font = ctx.font;
        let lh = font.line_height() as i32;
        let w = i32::from(ctx.width);
        let h = i32::from(ctx.height);

        let location = report.location.to_uppercase();
        font.draw_text(buf, &location, 1, 1, Rgb::WHITE);

        let temp_y = lh + 4;
        let temp = report.temperature.to_string();
        font.draw_text(buf, &temp, 1, temp_y, Rgb::WHITE);
        // Degree mark.
        let tw = font.measure_text(&temp) as i32;
        buf.draw_rect_outline(tw + 2, temp_y, 3, 3, Rgb::WHITE);

        let humidity = format!("H{}%", report.humidity);
        font.draw_text(buf, &humidity, 1, temp_y + lh + 2, RAIN);

        draw_icon(buf, report.condition, w - ICON_SIZE - 1, temp_y);

        let days = report.forecast.len().min(WeatherReport::FORECAST_DAYS) as i32;
        if days == 0 {
            return;
        }
        let col_w = w / days;
        let label_y = h - 2 * lh - 2;
        for (i, day) in report.forecast.iter().take(days as usize).enumerate() {
            let col_x = i as i32 * col_w;
            let initial: String = day.day.chars().take(1).collect();
            let high = day.high.to_string();
            let lx = col_x + (col_w - font.measure_text(&initial) as i32) / 2;
            let hx = col_x + (col_w - font.measure_text(&high) as i32) / 2;
            font.draw_text(buf, &initial, lx, label_y, LABEL);
            font.draw_text(buf, &high, hx, label_y + lh + 1, condition_color(day.condition));
        }
    }
}

impl Generator for WeatherMode {
    fn name(&self) -> &'static str {
        "Weather"
    }

    fn reset(&mut self) {}

    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer) {
        if ctx.is_empty() {
            return;
        }
        match ctx.weather.report() {
            Some(report) => Self::draw_report(&ctx, report, buf),
            None => {
                if let Some(text) = ctx.weather.placeholder() {
                    draw_centered(&ctx, buf, text, Rgb::WHITE);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::Fixture;
    use panelfx_core::{StaticWeatherProvider, WeatherStatus};

    fn placeholder_frame(status: WeatherStatus, text: &str) {
        let mut fx = Fixture::default();
        fx.weather = status;
        let mut buf = PixelBuffer::new(64, 64);
        WeatherMode.render(fx.ctx(64, 64, 1), &mut buf);

        let mut expected = PixelBuffer::new(64, 64);
        draw_centered(&fx.ctx(64, 64, 1), &mut expected, text, Rgb::WHITE);
        assert_eq!(buf, expected);
        assert!(buf.lit_pixels() > 0);
    }

    #[test]
    fn placeholders() {
        placeholder_frame(WeatherStatus::Unconfigured, "SET ZIP");
        placeholder_frame(WeatherStatus::Loading, "LOADING");
        placeholder_frame(WeatherStatus::Failed, "NO DATA");
    }

    #[test]
    fn report_layout() {
        let mut fx = Fixture::default();
        fx.weather = WeatherStatus::Ready(Arc::new(StaticWeatherProvider::sample_report("austin")));
        let mut buf = PixelBuffer::new(64, 64);
        WeatherMode.render(fx.ctx(64, 64, 1), &mut buf);

        // Location row.
        assert!((0..64).any(|x| buf.get(x, 3) == Some(Rgb::WHITE)));
        // Sun icon in the top-right box.
        let icon_lit = (51..63)
            .flat_map(|x| (11..23).map(move |y| (x, y)))
            .filter(|&(x, y)| buf.get(x, y) == Some(SUN))
            .count();
        assert!(icon_lit > 10);
        // Forecast highs along the bottom.
        assert!((0..64).any(|x| buf.get(x, 60) == Some(CLOUD) || buf.get(x, 60) == Some(SUN)));
    }

    #[test]
    fn every_icon_draws() {
        for condition in [
            WeatherCondition::Clear,
            WeatherCondition::Clouds,
            WeatherCondition::Rain,
            WeatherCondition::Snow,
            WeatherCondition::Storm,
            WeatherCondition::Fog,
        ] {
            let mut buf = PixelBuffer::new(ICON_SIZE as u16, ICON_SIZE as u16);
            draw_icon(&mut buf, condition, 0, 0);
            assert!(buf.lit_pixels() > 3, "{condition:?}");
        }
    }
}
