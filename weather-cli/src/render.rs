use weather_core::{DayViewModel, PipelineState};

/// Plain-text rendering of a pipeline state, one card per line.
pub fn render(state: &PipelineState) -> String {
    match state {
        PipelineState::Idle => "Type a city name to see its forecast.".to_string(),
        PipelineState::Loading => "Loading...".to_string(),
        PipelineState::Error { message } => format!("Error: {message}"),
        PipelineState::Ready { forecast, .. } if forecast.is_empty() => "No forecast.".to_string(),
        PipelineState::Ready { forecast, background } => {
            let mut out = format!("Weather Forecast [{}]", background.backdrop());
            for day in forecast {
                out.push('\n');
                out.push_str(&card(day));
            }
            out
        }
    }
}

fn card(day: &DayViewModel) -> String {
    format!(
        "{:<16} {:<24} max {:>5.1}°C  min {:>5.1}°C  wind {:>5.1} km/h  ({})",
        day.display_date, day.description, day.max_temp, day.min_temp, day.wind_speed, day.icon,
    )
}
