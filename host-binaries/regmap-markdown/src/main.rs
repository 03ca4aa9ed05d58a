// SPDX-FileCopyrightText: 2025 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

//! Writes the user project register map as markdown.
//!
//! Usage: `regmap-markdown [OUT_DIR]`, `OUT_DIR` defaults to `regmap-docs`.

use std::fmt::Write;
use std::fs::File;
use std::path::PathBuf;

use cf_hal::memory_map::{instances, INSTANCE_STRIDE};
use cf_hal::register::registers;
use cf_hal::{PeripheralKind, Register};
use heck::ToSnakeCase;

fn main() {
    use std::io::Write;

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("regmap-docs"));

    _ = std::fs::remove_dir_all(&out_dir);
    std::fs::create_dir_all(&out_dir).unwrap();

    let mut instance_file = File::create(out_dir.join("instances.md")).unwrap();
    writeln!(instance_file, "# User project peripherals\n").unwrap();
    writeln!(instance_file, "{}", generate_instances()).unwrap();
    writeln!(instance_file, "## Register layouts\n").unwrap();

    for kind in PeripheralKind::ALL {
        let file_name = format!("{}.md", kind.name().to_snake_case());
        let mut kind_file = File::create(out_dir.join(&file_name)).unwrap();
        writeln!(kind_file, "# {} registers\n", kind.name()).unwrap();
        writeln!(kind_file, "{}", generate_layout(kind)).unwrap();

        writeln!(instance_file, "- [{}]({file_name})", kind.name()).unwrap();
    }
}

fn generate_instances() -> String {
    let mut output = String::new();

    writeln!(output, "| Instance | Kind | Base | End |").unwrap();
    writeln!(output, "|----------|------|------|-----|").unwrap();
    for kind in PeripheralKind::ALL {
        for instance in instances(kind) {
            writeln!(
                output,
                "| `{instance}` | {} | `{:#010x}` | `{:#010x}` |",
                kind.name(),
                instance.base(),
                instance.base() + INSTANCE_STRIDE - 1
            )
            .unwrap();
        }
    }

    output
}

fn generate_layout(kind: PeripheralKind) -> String {
    let mut output = String::new();

    writeln!(output, "| Offset | Name | Accessor | Description |").unwrap();
    writeln!(output, "|--------|------|----------|-------------|").unwrap();
    for (register, offset) in registers(kind) {
        writeln!(
            output,
            "| `{offset:#06x}` | `{}` | `{}` | {} |",
            register.name(),
            accessor_name(register),
            register.description()
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "Offsets from `{:#x}` up are the queue and interrupt registers.",
        cf_hal::memory_map::QUEUE_OFFSET
    )
    .unwrap();

    output
}

/// The `Peripheral` method writing `register`, or reading it if it is read only.
fn accessor_name(register: Register) -> &'static str {
    match register {
        Register::RxData => "receive",
        Register::TxData => "send",
        Register::Config => "configure",
        Register::Control => "set_control",
        Register::Prescale => "set_prescale",
        Register::Status => "status",
        Register::Match => "set_match",
        Register::RxLevel => "rx_level",
        Register::RxThreshold => "set_rx_threshold",
        Register::RxFlush => "flush_rx",
        Register::TxLevel => "tx_level",
        Register::TxThreshold => "set_tx_threshold",
        Register::TxFlush => "flush_tx",
        Register::InterruptMask => "set_interrupt_mask",
        Register::MaskedInterruptStatus => "masked_interrupt_status",
        Register::RawInterruptStatus => "raw_interrupt_status",
        Register::InterruptClear => "clear_interrupts",
    }
}
