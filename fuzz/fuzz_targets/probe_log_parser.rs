#![no_main]

use libfuzzer_sys::fuzz_target;
use probesynth::config::SynthConfig;
use probesynth::filter::ProbeFilter;
use probesynth::pipeline::analyze;
use probesynth::ProbeLog;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing and analysis must never panic, whatever the log holds
        if let Ok(log) = ProbeLog::from_json_str(input) {
            let _ = analyze(&log.events(), &SynthConfig::default(), &ProbeFilter::all());
        }
        let _ = ProbeFilter::from_spec(input);
    }
});
