//! Kestrel kernel entry point.

#![cfg_attr(target_os = "none", no_std, no_main)]

#[cfg(target_os = "none")]
mod kernel {
    use bootloader::{entry_point, BootInfo};
    use core::fmt::Write;
    use core::panic::PanicInfo;
    use kestrel_common::DeviceError;
    use kestrel_hal::InterruptController;
    use kestrel_kernel::arch::x86_64::interrupts::{self, IrqTable};
    use kestrel_kernel::arch::x86_64::{self, serial, vga, PicController, X86Ports};
    use kestrel_kernel::boot::{self, Status};
    use kestrel_kernel::config::MouseConfig;
    use kestrel_kernel::console::Color;
    use kestrel_kernel::drivers::{KeyboardDriver, MouseDriver};
    use kestrel_kernel::shell::Shell;

    static KEYBOARD: KeyboardDriver = KeyboardDriver::new();
    static MOUSE: MouseDriver = MouseDriver::new(MouseConfig::DEFAULT);

    entry_point!(kernel_main);

    fn keyboard_irq() {
        KEYBOARD.handle_interrupt(&mut X86Ports, &mut PicController);
    }

    fn mouse_irq() {
        MOUSE.handle_interrupt(&mut X86Ports, &mut PicController);
    }

    fn kernel_main(_boot_info: &'static BootInfo) -> ! {
        let console = kestrel_kernel::init();
        let mut guard = console.lock();
        let terminal = &mut *guard;
        terminal.clear(Color::White, Color::Black);
        boot::banner::print_banner(terminal);
        boot::log(terminal, Status::Ok, "Serial port initialized");

        interrupts::init_idt();
        boot::log(terminal, Status::Ok, "IDT loaded, PICs remapped");

        KEYBOARD.initialize(&mut IrqTable, keyboard_irq);
        boot::log(terminal, Status::Ok, "Keyboard on IRQ 1");

        match MOUSE.initialize(&mut X86Ports, &mut IrqTable, mouse_irq) {
            Ok(()) => boot::log(terminal, Status::Ok, "Mouse streaming on IRQ 12"),
            Err(DeviceError::ControllerTimeout) => {
                boot::log(terminal, Status::Warn, "Mouse not responding");
            }
            Err(_) => boot::log(terminal, Status::Fail, "Mouse rejected setup"),
        }

        #[cfg(feature = "selftest")]
        {
            kestrel_kernel::tests::run_all();
            boot::log(terminal, Status::Ok, "Self tests passed");
        }

        PicController.enable();
        boot::log(terminal, Status::Ok, "Boot complete!");

        let colors = terminal.colors();
        terminal.set_colors(Color::Cyan, colors.background());
        terminal.put_str("\n Type 'help' for available commands.\n\n");
        terminal.set_colors(colors.foreground(), colors.background());

        Shell::new(terminal, &KEYBOARD, &MOUSE)
            .with_idle(x86_64::hlt)
            .run()
    }

    #[panic_handler]
    fn panic(info: &PanicInfo) -> ! {
        serial::try_print(format_args!("KERNEL PANIC: {}\n", info));

        // The console is held by the shell for the whole session; only
        // draw when nobody owns it.
        if let Some(console) = vga::CONSOLE.get() {
            if let Some(mut terminal) = console.try_lock() {
                terminal.set_colors(Color::LightRed, Color::Black);
                let _ = write!(terminal, "\n\n!!! KERNEL PANIC !!!\n{}\n", info);
            }
        }

        x86_64::halt_loop()
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
