//! Job orchestration
//!
//! [`GrblDriver`] owns one job end to end: pre-flight validation, serial
//! connection, preamble, per-part encoding and transmission, postamble,
//! and progress reporting. The link is released on every exit path. A job
//! either completes all three phases or fails; there is no partial-success
//! result and no mid-job resume.

use crate::serial::{FlowControlledLink, LinkParams, SerialLink};
use crate::transmitter::{CancelToken, TransmitConfig, Transmitter};
use kerf_core::job::{apply_start_point, check_job, Job, JobPart};
use kerf_core::{ConnectionError, Error, ProgressListener, Result};
use kerf_encoder::{
    encode_raster, encode_raster3d, encode_vector, expand_command_block, EmitterState,
    EncoderConfig,
};
use kerf_settings::DeviceConfig;

/// Driver for GRBL-family laser controllers.
///
/// One driver can send any number of jobs, one at a time; each job gets a
/// fresh emitter state so its first part always sets power and speed.
pub struct GrblDriver {
    config: DeviceConfig,
    transmit: TransmitConfig,
}

impl GrblDriver {
    /// Create a driver for the given device
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            transmit: TransmitConfig::default(),
        }
    }

    /// Override the transmission parameters
    pub fn with_transmit_config(mut self, transmit: TransmitConfig) -> Self {
        self.transmit = transmit;
        self
    }

    /// The device configuration this driver was built with
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Encoder view of the device configuration
    pub fn encoder_config(&self) -> EncoderConfig {
        EncoderConfig {
            bed_width_mm: self.config.bed_width_mm,
            flip_x_axis: self.config.flip_x_axis,
            max_laser_rate: self.config.max_laser_rate,
            raster_margin_mm: self.config.raster_margin_mm,
        }
    }

    /// Validate, encode, and send a job over the configured serial port.
    ///
    /// Fails before any bytes are sent when the job is invalid or the port
    /// cannot be opened; fails mid-job on flow-control timeout or
    /// cancellation. The port is closed in all cases.
    pub fn send_job(
        &self,
        job: &mut Job,
        listener: &mut dyn ProgressListener,
        cancel: &CancelToken,
    ) -> Result<()> {
        listener.progress_changed(0);

        listener.task_changed("checking job");
        check_job(job, self.config.bed_width_mm, self.config.bed_height_mm)?;
        apply_start_point(job);

        listener.task_changed("connecting");
        let params = LinkParams {
            port: self.config.port.clone(),
            baud_rate: self.config.baud_rate,
        };
        let mut link = match SerialLink::open(&params) {
            Ok(link) => link,
            Err(e) => {
                listener.task_changed(phase_label(&e));
                return Err(e);
            }
        };

        self.send_job_over_link(&mut link, job, listener, cancel)
    }

    /// Send an already-validated job over an open link.
    ///
    /// Split out from [`send_job`](Self::send_job) so delivery can be
    /// exercised against any [`FlowControlledLink`].
    pub fn send_job_over_link<L: FlowControlledLink>(
        &self,
        link: &mut L,
        job: &Job,
        listener: &mut dyn ProgressListener,
        cancel: &CancelToken,
    ) -> Result<()> {
        tracing::info!(job = %job.name, parts = job.parts.len(), "sending job");
        let result = self.stream_job(link, job, listener, cancel);
        let close_result = link.close();

        match result {
            Ok(()) => {
                close_result?;
                listener.task_changed("sent");
                listener.progress_changed(100);
                tracing::info!(job = %job.name, "job sent");
                Ok(())
            }
            Err(e) => {
                listener.task_changed(phase_label(&e));
                tracing::error!(job = %job.name, error = %e, "job failed");
                Err(e)
            }
        }
    }

    fn stream_job<L: FlowControlledLink>(
        &self,
        link: &mut L,
        job: &Job,
        listener: &mut dyn ProgressListener,
        cancel: &CancelToken,
    ) -> Result<()> {
        // power/speed memo lives for exactly one job
        let mut state = EmitterState::new();
        let encoder_config = self.encoder_config();
        let mut tx = Transmitter::new(link, &self.transmit, cancel.clone());

        listener.task_changed("sending");
        tx.send_stream(expand_command_block(&self.config.pre_gcode).as_bytes())?;
        listener.progress_changed(20);

        let total = job.parts.len();
        for (index, part) in job.parts.iter().enumerate() {
            let stream = match part {
                JobPart::Vector(p) => encode_vector(p, &mut state, &encoder_config),
                JobPart::Raster(p) => encode_raster(p, &mut state, &encoder_config),
                JobPart::Raster3d(p) => encode_raster3d(p, &mut state, &encoder_config),
            };
            tx.send_stream(stream.as_bytes())?;
            listener.progress_changed((20 + (index + 1) * 60 / total) as u8);
        }

        listener.task_changed("finishing");
        let postamble = format!("\n{}", expand_command_block(&self.config.post_gcode));
        tx.send_stream(postamble.as_bytes())?;
        Ok(())
    }
}

/// Terminal phase label for a failed job
fn phase_label(error: &Error) -> &'static str {
    match error {
        Error::Connection(ConnectionError::PortNotFound { .. }) => "port not found",
        Error::Connection(ConnectionError::FailedToOpen { .. }) => "could not open port",
        Error::Connection(ConnectionError::FlowControlTimeout { .. }) => "CTS timeout",
        Error::Cancelled => "cancelled",
        _ => "failed",
    }
}
