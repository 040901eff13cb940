//! HTML for the status page.

use crate::alarm::StatusReport;

/// Render the status and control page for `report`.
pub fn render_status_page(report: &StatusReport) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Gas Sentinel</title>
    <link rel="stylesheet" type="text/css" href="/styles.css">
    <script src="/script.js"></script>
</head>
<body>
    <div class="container">
        <h1>Smoke and Gas Alarm</h1>
        <p>Gas Sensor Status: {armed}</p>
        <p>Gas Sensor Value: {level:.2}</p>
        <p class="{state_class}">Status: {message}</p>
        <form action="/" method="POST">
            <input class="on" type="submit" name="submit" value="On">
            <input class="off" type="submit" name="submit" value="Off">
        </form>
        <button class="refresh" type="button" onclick="refreshPage()">Refresh</button>
    </div>
</body>
</html>
"#,
        armed = report.armed_label(),
        level = report.gas_level,
        state_class = if report.over_threshold { "alarm" } else { "normal" },
        message = report.alarm_message(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::report::{ALARM_MESSAGE, NORMAL_MESSAGE};

    #[test]
    fn test_renders_two_decimals() {
        let page = render_status_page(&StatusReport::new(true, 0.456, 0.03));
        assert!(page.contains("Gas Sensor Value: 0.46"));
        assert!(page.contains("Gas Sensor Status: ARMED"));
        assert!(page.contains(ALARM_MESSAGE));
    }

    #[test]
    fn test_renders_normal() {
        let page = render_status_page(&StatusReport::new(false, 0.0, 0.03));
        assert!(page.contains("Gas Sensor Value: 0.00"));
        assert!(page.contains("Gas Sensor Status: DISARMED"));
        assert!(page.contains(NORMAL_MESSAGE));
        assert!(page.contains(r#"name="submit" value="On""#));
    }
}
