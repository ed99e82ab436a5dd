use trafficcore::model::ViewModel;

/// Text rendering of the view model plus a short activity log.
#[derive(Debug, Default)]
pub struct Console {
    last: String,
    history: Vec<String>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rendered frame when it differs from the previous one.
    pub fn frame(&mut self, view: &ViewModel) -> Option<String> {
        let rendered = render(view);
        if rendered == self.last {
            return None;
        }
        self.last = rendered.clone();
        Some(rendered)
    }

    pub fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

pub fn render(view: &ViewModel) -> String {
    let mut lines = Vec::new();

    match view.map_center {
        Some(center) => lines.push(format!(
            "Map centre {:.4}, {:.4} | {} intersections",
            center.lat,
            center.lon,
            view.intersections.len()
        )),
        None => lines.push("Locating...".to_string()),
    }
    for intersection in &view.intersections {
        let marker = if view.selected.as_deref() == Some(intersection.id.as_str()) {
            '>'
        } else {
            ' '
        };
        lines.push(format!(
            "{marker} {:<8} {:<24} {:>4.0}% ({})",
            intersection.id,
            intersection.name,
            intersection.traffic_level * 100.0,
            intersection.congestion().label()
        ));
    }

    let Some(selected) = view.selected.as_deref() else {
        lines.push("No intersection selected".to_string());
        return lines.join("\n");
    };
    lines.push(format!("Intersection {selected}"));

    if let Some(latest) = view.traffic_data.last() {
        lines.push(format!(
            "  Traffic: {} points, latest {} -> {} vehicles at {:.1} km/h",
            view.traffic_data.len(),
            latest.time,
            latest.vehicle_count,
            latest.average_speed
        ));
    } else {
        lines.push("  Traffic: n/a".to_string());
    }
    lines.push(format!(
        "  Prediction: {}",
        view.prediction.as_deref().unwrap_or("n/a")
    ));
    match view.environmental_impact {
        Some(impact) => lines.push(format!(
            "  Impact: {:.2} L fuel saved, {:.2} kg CO2 avoided",
            impact.fuel_saved, impact.emissions_reduced
        )),
        None => lines.push("  Impact: n/a".to_string()),
    }
    match view.ai_confidence {
        Some(confidence) => lines.push(format!("  AI confidence: {confidence:.2}%")),
        None => lines.push("  AI confidence: n/a".to_string()),
    }
    if view.alerts.is_empty() {
        lines.push("  Alerts: none".to_string());
    }
    for alert in &view.alerts {
        lines.push(format!("  ! {}: {}", alert.title, alert.description));
    }
    if let Some(status) = &view.optimization_status {
        lines.push(format!("  Optimization: {status}"));
    }

    lines.join("\n")
}
